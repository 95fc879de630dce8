//! Sub-pixel peak fitting on three samples.
//!
//! Samples are dissimilarity scores at three positions along one direction,
//! the middle one being the best integer match at abscissa 0. The Gaussian
//! model fits the peak-height transform `mean/score - 1`; the parabola model
//! fits the raw scores.

mod cross;
mod gauss1d;
mod quad1d;

pub use cross::{refine_cross, CrossFit};
pub use gauss1d::{fit_gaussian_3, gaussian_warm_start, GaussianStart};
pub use quad1d::fit_parabola_3;

use crate::util::math::peak_height;

/// Curve fitted through the three samples around a peak.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PeakModel {
    /// `a * exp(-(d - b)^2 / c)` through the peak heights.
    #[default]
    Gaussian,
    /// Parabola through the dissimilarity scores.
    Parabola,
}

/// Acceptance settings for the iterative Gaussian fallback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitParams {
    /// Maximum RMS residual of an accepted fit, in peak-height units.
    pub tolerance: f64,
    /// Iteration budget per starting point.
    pub max_iterations: usize,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            max_iterations: 100,
        }
    }
}

/// Result of a successful three-point fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeakFit {
    /// Peak position relative to the middle sample.
    pub offset: f64,
    /// Gaussian width parameter `c`, or its curvature equivalent; may be NaN
    /// for the parabola model when the fitted minimum is not positive.
    pub width: f64,
    /// Fitted peak height.
    pub height: f64,
}

/// Fits `model` to scores sampled at `xs` (with `xs[1] == 0`).
///
/// Returns `None` when any sample is missing (NaN), when the samples do not
/// describe a peak, or when the fitted offset leaves `[xs[0], xs[2]]`.
pub fn fit_peak(
    model: PeakModel,
    xs: [f64; 3],
    scores: [f64; 3],
    mean: f64,
    params: FitParams,
) -> Option<PeakFit> {
    if scores.iter().any(|s| !s.is_finite()) || !mean.is_finite() {
        return None;
    }
    match model {
        PeakModel::Gaussian => {
            let heights = scores.map(|s| peak_height(mean, s));
            fit_gaussian_3(xs, heights, params)
        }
        PeakModel::Parabola => fit_parabola_3(xs, scores, mean),
    }
}
