//! Trimming of fully transparent template borders.

use crate::image::Rgba;

/// Number of fully transparent columns/rows stripped from each edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Margins {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl Margins {
    /// Size left after removing the margins from a `width x height` image.
    pub fn trimmed_size(&self, width: usize, height: usize) -> (usize, usize) {
        (
            width.saturating_sub(self.left + self.right).max(1),
            height.saturating_sub(self.top + self.bottom).max(1),
        )
    }
}

/// Finds the transparent margins of a row-major `width x height` image.
///
/// Edges are peeled in the order left, right, top, bottom; rows are tested over
/// the full width. Returns `None` when every pixel is transparent.
pub fn transparent_margins(pixels: &[Rgba], width: usize, height: usize) -> Option<Margins> {
    debug_assert_eq!(pixels.len(), width * height);
    let column_clear = |x: usize| (0..height).all(|y| pixels[y * width + x].is_transparent());
    let row_clear = |y: usize| {
        pixels[y * width..(y + 1) * width]
            .iter()
            .all(|px| px.is_transparent())
    };

    let mut left = 0;
    while left < width && column_clear(left) {
        left += 1;
    }
    if left == width {
        return None;
    }
    let mut right = 0;
    while left + right < width && column_clear(width - 1 - right) {
        right += 1;
    }
    let mut top = 0;
    while top < height && row_clear(top) {
        top += 1;
    }
    let mut bottom = 0;
    while top + bottom < height && row_clear(height - 1 - bottom) {
        bottom += 1;
    }

    Some(Margins {
        left,
        right,
        top,
        bottom,
    })
}

#[cfg(test)]
mod tests {
    use super::{transparent_margins, Margins};
    use crate::image::Rgba;

    fn image_with_opaque(width: usize, height: usize, opaque: &[(usize, usize)]) -> Vec<Rgba> {
        let mut pixels = vec![Rgba::TRANSPARENT; width * height];
        for &(x, y) in opaque {
            pixels[y * width + x] = Rgba::opaque(9, 9, 9);
        }
        pixels
    }

    #[test]
    fn margins_stop_at_first_opaque_line() {
        let pixels = image_with_opaque(7, 5, &[(2, 1), (4, 3)]);
        let margins = transparent_margins(&pixels, 7, 5).unwrap();
        assert_eq!(
            margins,
            Margins {
                left: 2,
                right: 2,
                top: 1,
                bottom: 1,
            }
        );
        assert_eq!(margins.trimmed_size(7, 5), (3, 3));
    }

    #[test]
    fn interior_holes_are_kept() {
        let pixels = image_with_opaque(3, 3, &[(0, 0), (2, 2)]);
        assert_eq!(
            transparent_margins(&pixels, 3, 3).unwrap(),
            Margins::default()
        );
    }

    #[test]
    fn fully_transparent_image_has_no_margins() {
        let pixels = vec![Rgba::TRANSPARENT; 12];
        assert!(transparent_margins(&pixels, 4, 3).is_none());
    }
}
