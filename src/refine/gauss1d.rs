//! Three-point Gaussian fit `y = a * exp(-(x - b)^2 / c)`.
//!
//! When all three heights are positive the fit is exact: the logarithms lie on
//! a parabola. Otherwise a damped Gauss-Newton (Levenberg-Marquardt) search
//! starts from a heuristic estimate and is accepted only when its RMS residual
//! is below the configured tolerance.

use super::{FitParams, PeakFit};
use crate::util::math::{parabola_through, solve3, LARGE_NUMBER};

/// Heuristic starting point for the iterative fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianStart {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Estimates Gaussian parameters from three samples with `xs[1] == 0`.
///
/// The peak offset follows from how strongly the middle sample is pulled
/// toward each neighbor; the width from the height ratio against the farther
/// neighbor.
pub fn gaussian_warm_start(xs: [f64; 3], ys: [f64; 3]) -> GaussianStart {
    let [x0, _, x2] = xs;
    let [y0, y1, y2] = ys;
    let pull = or_large(-x0 / (y1 - y0));
    let push = or_large(x2 / (y1 - y2));
    let mut b = 0.3 * (x2 - x0) * (push - pull) / (push + pull);
    if !b.is_finite() {
        b = 0.0;
    }

    let far_width = |x: f64, y: f64| {
        let w = b - x;
        w * w / (y1 / y).ln()
    };
    let (primary, secondary) = if b > 0.0 { ((x0, y0), (x2, y2)) } else { ((x2, y2), (x0, y0)) };
    let mut c = far_width(primary.0, primary.1);
    if !(c.is_finite() && c > 0.0) {
        c = far_width(secondary.0, secondary.1);
    }
    GaussianStart { a: y1, b, c }
}

/// Fits a Gaussian through three peak heights sampled at `xs`.
///
/// Returns `None` when no Gaussian with positive width fits, or when the
/// fitted center falls outside `[xs[0], xs[2]]`.
pub fn fit_gaussian_3(xs: [f64; 3], ys: [f64; 3], params: FitParams) -> Option<PeakFit> {
    if ys.iter().chain(xs.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    if ys.iter().all(|&y| y > 0.0) {
        let (alpha, beta, gamma) = parabola_through(xs, ys.map(f64::ln))?;
        if gamma < 0.0 {
            let b = -beta / (2.0 * gamma);
            let c = -1.0 / gamma;
            let a = (alpha + b * b / c).exp();
            return accept(xs, [a, b, c]);
        }
    }

    let start = gaussian_warm_start(xs, ys);
    if !(start.c.is_finite() && start.c > 0.0 && start.a.is_finite()) {
        return None;
    }
    [start.c, start.c / 3.0, start.c * 3.0]
        .into_iter()
        .filter_map(|c| levenberg_marquardt(xs, ys, [start.a, start.b, c], params))
        .find_map(|p| accept(xs, p))
}

fn or_large(v: f64) -> f64 {
    if v.is_nan() {
        LARGE_NUMBER
    } else {
        v
    }
}

fn accept(xs: [f64; 3], [a, b, c]: [f64; 3]) -> Option<PeakFit> {
    let in_range = b >= xs[0] && b <= xs[2];
    if in_range && c.is_finite() && c > 0.0 && a.is_finite() && a > 0.0 {
        Some(PeakFit {
            offset: b,
            width: c,
            height: a,
        })
    } else {
        None
    }
}

fn model(p: [f64; 3], x: f64) -> f64 {
    let d = x - p[1];
    p[0] * (-d * d / p[2]).exp()
}

fn sum_squares(xs: [f64; 3], ys: [f64; 3], p: [f64; 3]) -> Option<f64> {
    let cost: f64 = xs
        .iter()
        .zip(ys.iter())
        .map(|(&x, &y)| {
            let r = model(p, x) - y;
            r * r
        })
        .sum();
    cost.is_finite().then_some(cost)
}

/// Minimizes the squared residuals from `p`; returns the parameters when the
/// RMS residual ends below `params.tolerance`.
fn levenberg_marquardt(
    xs: [f64; 3],
    ys: [f64; 3],
    mut p: [f64; 3],
    params: FitParams,
) -> Option<[f64; 3]> {
    let mut cost = sum_squares(xs, ys, p)?;
    let mut lambda = 1e-3;
    let converged = (params.tolerance * 1e-3).powi(2) * 3.0;

    for _ in 0..params.max_iterations {
        if cost <= converged {
            break;
        }
        let mut jtj = [[0.0f64; 3]; 3];
        let mut jtr = [0.0f64; 3];
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            let d = x - p[1];
            let e = (-d * d / p[2]).exp();
            let f = p[0] * e;
            let grad = [e, f * 2.0 * d / p[2], f * d * d / (p[2] * p[2])];
            let r = f - y;
            for i in 0..3 {
                jtr[i] -= grad[i] * r;
                for j in 0..3 {
                    jtj[i][j] += grad[i] * grad[j];
                }
            }
        }

        let mut damped = jtj;
        for (k, row) in damped.iter_mut().enumerate() {
            row[k] += lambda * jtj[k][k].max(1e-12);
        }
        let trial = solve3(damped, jtr).map(|step| [p[0] + step[0], p[1] + step[1], p[2] + step[2]]);
        match trial.and_then(|t| sum_squares(xs, ys, t).map(|c| (t, c))) {
            Some((t, c)) if c < cost && t[2] > 0.0 => {
                p = t;
                cost = c;
                lambda = (lambda * 0.1).max(1e-12);
            }
            _ => {
                lambda *= 10.0;
                if lambda > 1e12 {
                    break;
                }
            }
        }
    }

    let rms = (cost / xs.len() as f64).sqrt();
    (rms < params.tolerance).then_some(p)
}
