//! Rayon-parallel grid scan (feature-gated).
//!
//! Columns of placements are scored in parallel and reduced in column order.
//! Integer scores make the sum order-independent, and the ordered reduction
//! keeps the x-major tie-break, so results match the serial scan exactly.

use crate::image::TargetWindow;
use crate::kernel::{GridScan, Kernel, ScanAccumulator};
use crate::template::TemplatePlan;
use rayon::prelude::*;

/// Column-parallel version of [`Kernel::scan_grid`].
pub fn scan_grid_par<K: Kernel>(
    window: &TargetWindow,
    plan: &TemplatePlan,
    max_x: usize,
    max_y: usize,
) -> Option<GridScan> {
    let columns: Vec<ScanAccumulator> = (0..=max_x)
        .into_par_iter()
        .map(|x| {
            let mut acc = ScanAccumulator::new();
            for y in 0..=max_y {
                acc.push(x, y, K::score_at(window, plan, x as isize, y as isize));
            }
            acc
        })
        .collect();

    columns
        .into_iter()
        .reduce(ScanAccumulator::merge)
        .and_then(ScanAccumulator::finish)
}

#[cfg(test)]
mod tests {
    use super::scan_grid_par;
    use crate::image::{PixelBuffer, Rgba, TargetWindow};
    use crate::kernel::scalar::ScalarKernel;
    use crate::kernel::Kernel;
    use crate::template::TemplatePlan;

    #[test]
    fn parallel_scan_matches_serial_including_ties() {
        // periodic target: many exact ties
        let target = PixelBuffer::from_fn(24, 18, |x, y| {
            Rgba::opaque(((x % 4) * 60) as u8, ((y % 3) * 80) as u8, 9)
        })
        .unwrap();
        let tpl = target.view().roi(4, 3, 4, 3).unwrap().to_owned_buffer();
        let plan = TemplatePlan::from_pixels(tpl.data(), 4, 3).unwrap();
        let window = TargetWindow::from_view(target.view(), 0, 0, 24, 18).unwrap();
        let serial = ScalarKernel::scan_grid(&window, &plan, 20, 15).unwrap();
        let parallel = scan_grid_par::<ScalarKernel>(&window, &plan, 20, 15).unwrap();
        assert_eq!(serial, parallel);
        assert_eq!((serial.best_x, serial.best_y), (0, 0));
    }
}
