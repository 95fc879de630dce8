//! Exhaustive search over a clamped rectangle.

use crate::image::TargetWindow;
#[cfg(feature = "rayon")]
use crate::kernel::rayon::scan_grid_par;
use crate::kernel::{DefaultKernel, GridScan, Kernel};
use crate::refine::refine_cross;
use crate::search::{MatchConfig, Outcome};
use crate::template::TemplatePlan;
use crate::trace::trace_event;
use crate::util::math::peak_height;

/// Scans every offset of the window and refines the best one.
///
/// `max_x` and `max_y` are the clamped search width and height; the window
/// must hold the template at every offset up to them.
pub(crate) fn grid_search(
    window: &TargetWindow,
    plan: &TemplatePlan,
    max_x: usize,
    max_y: usize,
    config: &MatchConfig,
) -> Option<Outcome> {
    let scan = scan(window, plan, max_x, max_y, config.parallel)?;
    trace_event!(
        "grid_scan",
        best_x = scan.best_x,
        best_y = scan.best_y,
        min_score = scan.min_score,
        mean_score = scan.mean_score,
        count = scan.count
    );

    let height = peak_height(scan.mean_score, scan.min_score);
    let mut outcome = Outcome {
        offset: (scan.best_x, scan.best_y),
        delta: (0.0, 0.0),
        peak_height: height,
        peak_width: f64::NAN,
    };
    if !height.is_finite() {
        return Some(outcome);
    }

    let (bx, by) = (scan.best_x as isize, scan.best_y as isize);
    let score = |dx: isize, dy: isize| DefaultKernel::score_at(window, plan, bx + dx, by + dy);
    let center = scan.min_score;
    let fit = refine_cross(
        config.peak_model,
        [score(-1, 0), center, score(1, 0)],
        [score(0, -1), center, score(0, 1)],
        scan.mean_score,
        config.fit_params(),
    );
    if fit.horizontal.is_none() || fit.vertical.is_none() {
        trace_event!(
            "peak_fit_failed",
            horizontal = fit.horizontal.is_some(),
            vertical = fit.vertical.is_some()
        );
    }
    outcome.delta = (fit.dx, fit.dy);
    outcome.peak_width = fit.width;
    Some(outcome)
}

fn scan(
    window: &TargetWindow,
    plan: &TemplatePlan,
    max_x: usize,
    max_y: usize,
    parallel: bool,
) -> Option<GridScan> {
    #[cfg(feature = "rayon")]
    if parallel {
        return scan_grid_par::<DefaultKernel>(window, plan, max_x, max_y);
    }
    #[cfg(not(feature = "rayon"))]
    let _ = parallel;
    DefaultKernel::scan_grid(window, plan, max_x, max_y)
}
