//! Separable refinement around a grid minimum.

use super::{fit_peak, FitParams, PeakFit, PeakModel};

/// Sub-pixel correction from fits along both grid axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossFit {
    /// Horizontal offset; zero when the horizontal fit failed.
    pub dx: f64,
    /// Vertical offset; zero when the vertical fit failed.
    pub dy: f64,
    /// Mean of both fitted widths, NaN unless both fits succeeded.
    pub width: f64,
    pub horizontal: Option<PeakFit>,
    pub vertical: Option<PeakFit>,
}

/// Fits each axis independently from the scores at `-1, 0, +1`.
///
/// `horizontal` holds the scores left of, at and right of the minimum;
/// `vertical` those above, at and below it.
pub fn refine_cross(
    model: PeakModel,
    horizontal: [f64; 3],
    vertical: [f64; 3],
    mean: f64,
    params: FitParams,
) -> CrossFit {
    const UNIT: [f64; 3] = [-1.0, 0.0, 1.0];
    let horizontal = fit_peak(model, UNIT, horizontal, mean, params);
    let vertical = fit_peak(model, UNIT, vertical, mean, params);
    let width = match (horizontal, vertical) {
        (Some(h), Some(v)) => (h.width + v.width) / 2.0,
        _ => f64::NAN,
    };
    CrossFit {
        dx: horizontal.map_or(0.0, |fit| fit.offset),
        dy: vertical.map_or(0.0, |fit| fit.offset),
        width,
        horizontal,
        vertical,
    }
}

#[cfg(test)]
mod tests {
    use super::refine_cross;
    use crate::refine::{FitParams, PeakModel};

    #[test]
    fn failed_axis_contributes_no_offset() {
        let fit = refine_cross(
            PeakModel::Gaussian,
            [40.0, 10.0, 20.0],
            [10.0, f64::NAN, 10.0],
            100.0,
            FitParams::default(),
        );
        assert!(fit.dx > 0.0);
        assert_eq!(fit.dy, 0.0);
        assert!(fit.vertical.is_none());
        assert!(fit.width.is_nan());
    }

    #[test]
    fn width_averages_both_axes() {
        let fit = refine_cross(
            PeakModel::Gaussian,
            [30.0, 5.0, 30.0],
            [20.0, 5.0, 20.0],
            100.0,
            FitParams::default(),
        );
        let h = fit.horizontal.unwrap().width;
        let v = fit.vertical.unwrap().width;
        assert!((fit.width - (h + v) / 2.0).abs() < 1e-12);
        assert!(fit.dx.abs() < 1e-12 && fit.dy.abs() < 1e-12);
    }
}
