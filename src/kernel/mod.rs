//! Dissimilarity kernels.
//!
//! A kernel scores one placement of the template inside a [`TargetWindow`]:
//! the sum over non-transparent template pixels of the squared RGB channel
//! differences. Scores are exact integers carried in `f64`, so every kernel
//! returns bit-identical values and scan order alone decides ties.

use crate::image::TargetWindow;
use crate::template::TemplatePlan;

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(feature = "rayon")]
pub mod rayon;

/// Kernel used by the matcher for single-threaded scoring.
#[cfg(feature = "simd")]
pub type DefaultKernel = simd::SimdKernel;

/// Kernel used by the matcher for single-threaded scoring.
#[cfg(not(feature = "simd"))]
pub type DefaultKernel = scalar::ScalarKernel;

/// Summary of a scan over a grid of placements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridScan {
    /// Offset of the lowest score; the first in x-major order on ties.
    pub best_x: usize,
    pub best_y: usize,
    pub min_score: f64,
    /// Mean of all finite scores.
    pub mean_score: f64,
    /// Number of placements that produced a finite score.
    pub count: usize,
}

/// Scores template placements inside a target window.
pub trait Kernel {
    /// Score with the template's top-left at window offset `(x, y)`.
    ///
    /// Returns NaN unless the whole template lies inside the window.
    fn score_at(window: &TargetWindow, plan: &TemplatePlan, x: isize, y: isize) -> f64;

    /// Scores every offset in `0..=max_x` by `0..=max_y`, x outermost.
    ///
    /// Returns `None` when no offset produced a finite score.
    fn scan_grid(
        window: &TargetWindow,
        plan: &TemplatePlan,
        max_x: usize,
        max_y: usize,
    ) -> Option<GridScan> {
        let mut acc = ScanAccumulator::new();
        for x in 0..=max_x {
            for y in 0..=max_y {
                acc.push(x, y, Self::score_at(window, plan, x as isize, y as isize));
            }
        }
        acc.finish()
    }
}

/// Running minimum and sum over scores visited in scan order.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScanAccumulator {
    best_x: usize,
    best_y: usize,
    min_score: f64,
    sum: f64,
    count: usize,
}

impl ScanAccumulator {
    pub(crate) fn new() -> Self {
        Self {
            best_x: 0,
            best_y: 0,
            min_score: f64::INFINITY,
            sum: 0.0,
            count: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, x: usize, y: usize, score: f64) {
        if !score.is_finite() {
            return;
        }
        self.sum += score;
        self.count += 1;
        if score < self.min_score {
            self.min_score = score;
            self.best_x = x;
            self.best_y = y;
        }
    }

    /// Combines with an accumulator covering placements later in scan order.
    #[cfg_attr(not(feature = "rayon"), allow(dead_code))]
    pub(crate) fn merge(mut self, later: Self) -> Self {
        self.sum += later.sum;
        self.count += later.count;
        if later.min_score < self.min_score {
            self.min_score = later.min_score;
            self.best_x = later.best_x;
            self.best_y = later.best_y;
        }
        self
    }

    pub(crate) fn finish(self) -> Option<GridScan> {
        (self.count > 0).then(|| GridScan {
            best_x: self.best_x,
            best_y: self.best_y,
            min_score: self.min_score,
            mean_score: self.sum / self.count as f64,
            count: self.count,
        })
    }
}

/// Returns the offset as `usize` when the template fits there.
#[inline]
pub(crate) fn placement(
    window: &TargetWindow,
    plan: &TemplatePlan,
    x: isize,
    y: isize,
) -> Option<(usize, usize)> {
    let x = usize::try_from(x).ok()?;
    let y = usize::try_from(y).ok()?;
    let fits_x = x.checked_add(plan.width())? <= window.width();
    let fits_y = y.checked_add(plan.height())? <= window.height();
    (fits_x && fits_y).then_some((x, y))
}
