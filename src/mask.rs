//! Point-containment regions used to mask templates.
//!
//! The matcher only needs to ask whether a point lies inside the region, so a
//! mask is any [`Region`]: one of the shapes below, or a plain closure.

/// A point-containment test in sample-image pixel coordinates.
///
/// Pixel `(x, y)` covers the cell `[x, x+1] x [y, y+1]`.
pub trait Region {
    /// Returns true when `(x, y)` lies inside the region.
    fn contains(&self, x: f64, y: f64) -> bool;
}

impl<F> Region for F
where
    F: Fn(f64, f64) -> bool,
{
    fn contains(&self, x: f64, y: f64) -> bool {
        self(x, y)
    }
}

/// Returns true when all four corners of pixel cell `(x, y)` are inside.
pub fn pixel_inside<R: Region + ?Sized>(region: &R, x: usize, y: usize) -> bool {
    let (x, y) = (x as f64, y as f64);
    region.contains(x, y)
        && region.contains(x + 1.0, y)
        && region.contains(x, y + 1.0)
        && region.contains(x + 1.0, y + 1.0)
}

/// Closed axis-aligned rectangle `[x, x+width] x [y, y+height]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectRegion {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl Region for RectRegion {
    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Closed axis-aligned ellipse inscribed in a bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipseRegion {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

impl EllipseRegion {
    /// Ellipse centered at `(cx, cy)` with semi-axes `rx`, `ry`.
    pub fn new(cx: f64, cy: f64, rx: f64, ry: f64) -> Self {
        Self { cx, cy, rx, ry }
    }

    /// Ellipse inscribed in the box `[x, x+width] x [y, y+height]`.
    pub fn inscribed(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x + width / 2.0, y + height / 2.0, width / 2.0, height / 2.0)
    }
}

impl Region for EllipseRegion {
    fn contains(&self, x: f64, y: f64) -> bool {
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return false;
        }
        let u = (x - self.cx) / self.rx;
        let v = (y - self.cy) / self.ry;
        // small slack so points computed on the boundary stay inside
        u * u + v * v <= 1.0 + 1e-12
    }
}

/// Simple polygon evaluated with the even-odd rule.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonRegion {
    vertices: Vec<(f64, f64)>,
}

impl PolygonRegion {
    pub fn new(vertices: Vec<(f64, f64)>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }
}

impl Region for PolygonRegion {
    fn contains(&self, x: f64, y: f64) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.vertices[i];
            let (xj, yj) = self.vertices[j];
            if (yi > y) != (yj > y) {
                let x_cross = xi + (y - yi) * (xj - xi) / (yj - yi);
                if x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::{pixel_inside, EllipseRegion, PolygonRegion, RectRegion, Region};

    #[test]
    fn rect_region_is_closed() {
        let rect = RectRegion::new(1.0, 1.0, 8.0, 8.0);
        assert!(rect.contains(1.0, 1.0));
        assert!(rect.contains(9.0, 9.0));
        assert!(!rect.contains(9.01, 5.0));
        assert!(pixel_inside(&rect, 8, 8));
        assert!(!pixel_inside(&rect, 9, 8));
        assert!(!pixel_inside(&rect, 0, 4));
    }

    #[test]
    fn ellipse_region_requires_all_corners() {
        let ellipse = EllipseRegion::inscribed(0.0, 0.0, 10.0, 10.0);
        assert!(pixel_inside(&ellipse, 4, 4));
        assert!(!pixel_inside(&ellipse, 0, 0));
        assert!(!pixel_inside(&ellipse, 9, 5));
    }

    #[test]
    fn polygon_region_uses_even_odd_rule() {
        let triangle = PolygonRegion::new(vec![(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        assert!(triangle.contains(2.0, 2.0));
        assert!(!triangle.contains(8.0, 8.0));
        assert!(!PolygonRegion::new(vec![(0.0, 0.0), (1.0, 1.0)]).contains(0.5, 0.5));
    }

    #[test]
    fn closures_are_regions() {
        let left_half = |x: f64, _y: f64| x <= 5.0;
        assert!(pixel_inside(&left_half, 4, 0));
        assert!(!pixel_inside(&left_half, 5, 0));
    }
}
