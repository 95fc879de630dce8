//! Planar RGB copy of the target region a search scans.

use crate::image::{PixelView, Rgba};
use crate::util::TrackMatchResult;

/// RGB planes of a rectangular region of the target image.
///
/// Alpha is dropped: target pixels always count as opaque. The planes are
/// refilled in place by [`TargetWindow::fill`] so repeated searches do not
/// reallocate once the largest window has been seen.
#[derive(Clone, Debug, Default)]
pub struct TargetWindow {
    origin_x: usize,
    origin_y: usize,
    width: usize,
    height: usize,
    red: Vec<i32>,
    green: Vec<i32>,
    blue: Vec<i32>,
}

impl TargetWindow {
    /// Empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies `width x height` pixels of `view` starting at `(x, y)`.
    pub fn from_view(
        view: PixelView<'_>,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> TrackMatchResult<Self> {
        let mut window = Self::new();
        window.fill(view, x, y, width, height)?;
        Ok(window)
    }

    /// Replaces the window contents with a region of `view`.
    ///
    /// Fails with `RoiOutOfBounds` when the region does not fit in `view`;
    /// the window is left unchanged in that case.
    pub fn fill(
        &mut self,
        view: PixelView<'_>,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> TrackMatchResult<()> {
        let roi = view.roi(x, y, width, height)?;
        self.red.clear();
        self.green.clear();
        self.blue.clear();
        for row in (0..height).filter_map(|j| roi.row(j)) {
            for px in row {
                self.red.push(px.r as i32);
                self.green.push(px.g as i32);
                self.blue.push(px.b as i32);
            }
        }
        self.origin_x = x;
        self.origin_y = y;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Top-left corner of the window in target coordinates.
    pub fn origin(&self) -> (usize, usize) {
        (self.origin_x, self.origin_y)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn red(&self) -> &[i32] {
        &self.red
    }

    pub fn green(&self) -> &[i32] {
        &self.green
    }

    pub fn blue(&self) -> &[i32] {
        &self.blue
    }

    /// Opaque pixel at window coordinates `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.width + x;
        Some(Rgba::opaque(
            self.red[idx] as u8,
            self.green[idx] as u8,
            self.blue[idx] as u8,
        ))
    }
}
