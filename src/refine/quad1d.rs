//! Parabola fit through three dissimilarity scores.

use super::PeakFit;
use crate::util::math::{parabola_through, peak_height};

/// Locates the minimum of the parabola through `scores` sampled at `xs`.
///
/// The parabola must open upward and its vertex must lie within
/// `[xs[0], xs[2]]`. The reported width is the Gaussian width equivalent of
/// the curvature at the vertex, `S0 * (mean - S0) / (mean * k)` for fitted
/// minimum `S0` and curvature `k`; it is NaN when that quantity is not
/// positive.
pub fn fit_parabola_3(xs: [f64; 3], scores: [f64; 3], mean: f64) -> Option<PeakFit> {
    let (alpha, beta, gamma) = parabola_through(xs, scores)?;
    if gamma <= 0.0 {
        return None;
    }

    let offset = -beta / (2.0 * gamma);
    if !(offset >= xs[0] && offset <= xs[2]) {
        return None;
    }
    let minimum = alpha - beta * beta / (4.0 * gamma);
    let width = minimum * (mean - minimum) / (mean * gamma);
    Some(PeakFit {
        offset,
        width: if width.is_finite() && width > 0.0 {
            width
        } else {
            f64::NAN
        },
        height: peak_height(mean, minimum),
    })
}
