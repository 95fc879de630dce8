//! Portable scalar kernel.

use crate::image::TargetWindow;
use crate::kernel::{placement, Kernel};
use crate::template::TemplatePlan;

/// Row-wise scalar sum of weighted squared RGB differences.
pub struct ScalarKernel;

impl Kernel for ScalarKernel {
    fn score_at(window: &TargetWindow, plan: &TemplatePlan, x: isize, y: isize) -> f64 {
        let Some((x, y)) = placement(window, plan, x, y) else {
            return f64::NAN;
        };
        let tpl_width = plan.width();
        let win_width = window.width();

        let mut total = 0i64;
        for ty in 0..plan.height() {
            let t = ty * tpl_width..(ty + 1) * tpl_width;
            let w_start = (y + ty) * win_width + x;
            let w = w_start..w_start + tpl_width;
            let tr = &plan.red()[t.clone()];
            let tg = &plan.green()[t.clone()];
            let tb = &plan.blue()[t.clone()];
            let weight = &plan.weight()[t];
            let wr = &window.red()[w.clone()];
            let wg = &window.green()[w.clone()];
            let wb = &window.blue()[w];

            let mut row = 0i64;
            for i in 0..tpl_width {
                let dr = tr[i] - wr[i];
                let dg = tg[i] - wg[i];
                let db = tb[i] - wb[i];
                row += i64::from(weight[i] * (dr * dr + dg * dg + db * db));
            }
            total += row;
        }
        total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::ScalarKernel;
    use crate::image::{PixelBuffer, Rgba, TargetWindow};
    use crate::kernel::Kernel;
    use crate::template::TemplatePlan;

    fn plan_of(buffer: &PixelBuffer) -> TemplatePlan {
        TemplatePlan::from_pixels(buffer.data(), buffer.width(), buffer.height()).unwrap()
    }

    #[test]
    fn score_counts_only_opaque_pixels() {
        let tpl = PixelBuffer::new(
            vec![
                Rgba::opaque(10, 0, 0),
                Rgba::new(200, 200, 200, 0),
                Rgba::opaque(0, 0, 0),
                Rgba::opaque(0, 3, 4),
            ],
            2,
            2,
        )
        .unwrap();
        let target = PixelBuffer::filled(3, 3, Rgba::opaque(0, 0, 0)).unwrap();
        let window = TargetWindow::from_view(target.view(), 0, 0, 3, 3).unwrap();
        let score = ScalarKernel::score_at(&window, &plan_of(&tpl), 1, 1);
        assert_eq!(score, 100.0 + 9.0 + 16.0);
    }

    #[test]
    fn partial_placements_score_nan() {
        let tpl = PixelBuffer::filled(2, 2, Rgba::opaque(1, 1, 1)).unwrap();
        let target = PixelBuffer::filled(4, 3, Rgba::opaque(0, 0, 0)).unwrap();
        let window = TargetWindow::from_view(target.view(), 0, 0, 4, 3).unwrap();
        let plan = plan_of(&tpl);
        assert!(ScalarKernel::score_at(&window, &plan, -1, 0).is_nan());
        assert!(ScalarKernel::score_at(&window, &plan, 3, 0).is_nan());
        assert!(ScalarKernel::score_at(&window, &plan, 0, 2).is_nan());
        assert_eq!(ScalarKernel::score_at(&window, &plan, 2, 1), 12.0);
    }

    #[test]
    fn scan_grid_finds_exact_copy() {
        let target = PixelBuffer::from_fn(8, 6, |x, y| {
            Rgba::opaque((x * 31 % 256) as u8, (y * 47 % 256) as u8, ((x * y) % 256) as u8)
        })
        .unwrap();
        let tpl = target.view().roi(3, 2, 3, 3).unwrap().to_owned_buffer();
        let window = TargetWindow::from_view(target.view(), 0, 0, 8, 6).unwrap();
        let scan = ScalarKernel::scan_grid(&window, &plan_of(&tpl), 5, 3).unwrap();
        assert_eq!((scan.best_x, scan.best_y), (3, 2));
        assert_eq!(scan.min_score, 0.0);
        assert_eq!(scan.count, 24);
    }
}
