//! SIMD kernel using the `wide` crate.
//!
//! The inner template row loop processes 8 pixels at a time in `i32x8`
//! lanes. Per-pixel terms stay below `3 * 255^2`, and row sums are widened to
//! `i64` after each row, so results equal the scalar kernel exactly.

use crate::image::TargetWindow;
use crate::kernel::{placement, Kernel};
use crate::template::TemplatePlan;
use wide::i32x8;

const LANES: usize = 8;

/// Load 8 i32 values into i32x8.
#[inline]
fn load_i32x8(slice: &[i32]) -> i32x8 {
    i32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

/// Horizontal sum of i32x8, widened.
#[inline]
fn hsum(v: i32x8) -> i64 {
    v.to_array().iter().map(|&lane| i64::from(lane)).sum()
}

/// SIMD-accelerated weighted RGB SSD kernel.
pub struct SimdKernel;

impl Kernel for SimdKernel {
    fn score_at(window: &TargetWindow, plan: &TemplatePlan, x: isize, y: isize) -> f64 {
        let Some((x, y)) = placement(window, plan, x, y) else {
            return f64::NAN;
        };
        let tpl_width = plan.width();
        let win_width = window.width();
        let simd_end = tpl_width / LANES * LANES;

        let mut total = 0i64;
        for ty in 0..plan.height() {
            let t = ty * tpl_width;
            let w = (y + ty) * win_width + x;

            // Lanes are flushed to i64 long before they could overflow.
            let mut acc = i32x8::splat(0);
            let mut row = 0i64;
            let mut tx = 0;
            while tx < simd_end {
                let dr = load_i32x8(&plan.red()[t + tx..]) - load_i32x8(&window.red()[w + tx..]);
                let dg =
                    load_i32x8(&plan.green()[t + tx..]) - load_i32x8(&window.green()[w + tx..]);
                let db = load_i32x8(&plan.blue()[t + tx..]) - load_i32x8(&window.blue()[w + tx..]);
                let weight = load_i32x8(&plan.weight()[t + tx..]);
                acc = acc + weight * (dr * dr + dg * dg + db * db);
                tx += LANES;
                if tx % (LANES * 1024) == 0 {
                    row += hsum(acc);
                    acc = i32x8::splat(0);
                }
            }
            row += hsum(acc);

            // Scalar remainder
            while tx < tpl_width {
                let dr = plan.red()[t + tx] - window.red()[w + tx];
                let dg = plan.green()[t + tx] - window.green()[w + tx];
                let db = plan.blue()[t + tx] - window.blue()[w + tx];
                row += i64::from(plan.weight()[t + tx] * (dr * dr + dg * dg + db * db));
                tx += 1;
            }
            total += row;
        }
        total as f64
    }
}
