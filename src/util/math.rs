//! Numeric helpers shared by the scorers and the peak fits.

/// Stand-in for an unbounded pull/push ratio in the peak warm start.
pub(crate) const LARGE_NUMBER: f64 = 1.0e10;

/// Converts a dissimilarity score into a peak height relative to the mean.
///
/// `NaN` scores propagate; a zero score against a positive mean is `+inf`.
#[inline]
pub(crate) fn peak_height(mean: f64, score: f64) -> f64 {
    mean / score - 1.0
}

/// Coefficients `(alpha, beta, gamma)` of `y = alpha + beta*x + gamma*x^2`
/// through three points with distinct abscissae.
pub(crate) fn parabola_through(xs: [f64; 3], ys: [f64; 3]) -> Option<(f64, f64, f64)> {
    let [x0, x1, x2] = xs;
    let [y0, y1, y2] = ys;
    if x0 == x1 || x1 == x2 || x0 == x2 {
        return None;
    }
    let d01 = (y1 - y0) / (x1 - x0);
    let d12 = (y2 - y1) / (x2 - x1);
    let gamma = (d12 - d01) / (x2 - x0);
    let beta = d01 - gamma * (x0 + x1);
    let alpha = y0 - beta * x0 - gamma * x0 * x0;
    if alpha.is_finite() && beta.is_finite() && gamma.is_finite() {
        Some((alpha, beta, gamma))
    } else {
        None
    }
}

/// Solves the 3x3 system `m * v = rhs` by Gaussian elimination with partial
/// pivoting. Returns `None` for singular or non-finite systems.
pub(crate) fn solve3(mut m: [[f64; 3]; 3], mut rhs: [f64; 3]) -> Option<[f64; 3]> {
    for col in 0..3 {
        let mut pivot = col;
        for row in (col + 1)..3 {
            if m[row][col].abs() > m[pivot][col].abs() {
                pivot = row;
            }
        }
        if !m[pivot][col].is_finite() || m[pivot][col].abs() < 1e-300 {
            return None;
        }
        m.swap(col, pivot);
        rhs.swap(col, pivot);
        for row in (col + 1)..3 {
            let factor = m[row][col] / m[col][col];
            for k in col..3 {
                m[row][k] -= factor * m[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut out = [0.0f64; 3];
    for row in (0..3).rev() {
        let mut acc = rhs[row];
        for k in (row + 1)..3 {
            acc -= m[row][k] * out[k];
        }
        out[row] = acc / m[row][row];
    }
    if out.iter().all(|v| v.is_finite()) {
        Some(out)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{parabola_through, peak_height, solve3};

    #[test]
    fn peak_height_handles_exact_and_missing_scores() {
        assert!((peak_height(10.0, 2.0) - 4.0).abs() < 1e-12);
        assert_eq!(peak_height(10.0, 0.0), f64::INFINITY);
        assert!(peak_height(10.0, f64::NAN).is_nan());
        assert!(peak_height(0.0, 0.0).is_nan());
    }

    #[test]
    fn parabola_through_recovers_coefficients() {
        let f = |x: f64| 2.0 - 0.5 * x + 3.0 * x * x;
        let xs = [-1.3, 0.0, 0.7];
        let (a, b, c) = parabola_through(xs, xs.map(f)).unwrap();
        assert!((a - 2.0).abs() < 1e-12);
        assert!((b + 0.5).abs() < 1e-12);
        assert!((c - 3.0).abs() < 1e-12);
        assert!(parabola_through([0.0, 0.0, 1.0], [1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn solve3_matches_known_solution() {
        let m = [[0.0, 2.0, 1.0], [1.0, 1.0, 1.0], [4.0, -1.0, 2.0]];
        let expected = [1.0, -2.0, 3.0];
        let rhs = [
            m[0][0] * expected[0] + m[0][1] * expected[1] + m[0][2] * expected[2],
            m[1][0] * expected[0] + m[1][1] * expected[1] + m[1][2] * expected[2],
            m[2][0] * expected[0] + m[2][1] * expected[1] + m[2][2] * expected[2],
        ];
        let v = solve3(m, rhs).unwrap();
        for (got, want) in v.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-12);
        }
        assert!(solve3([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]], [1.0; 3]).is_none());
    }
}
