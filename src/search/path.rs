//! Search along a straight line through the search area.
//!
//! The line is walked cell by cell: every crossing with an integer grid line
//! splits it into segments, and the midpoint of each segment names one
//! candidate offset. With a spread the same walk runs on parallel lines
//! shifted perpendicular to the direction.

use std::collections::HashMap;

use crate::image::TargetWindow;
use crate::kernel::{DefaultKernel, Kernel};
use crate::refine::fit_peak;
use crate::search::area::{Point, SearchArea};
use crate::search::{MatchConfig, Outcome};
use crate::template::TemplatePlan;
use crate::trace::trace_event;
use crate::util::math::peak_height;

const SNAP_TAN_HIGH: f64 = 1.0e10;
const SNAP_TAN_LOW: f64 = 1.0e-10;
const EPS: f64 = 1.0e-9;

/// A line search constraint in target pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineConstraint {
    /// Any point on the line.
    pub point: Point,
    /// Direction in radians, counter-clockwise from the +x axis with y
    /// pointing up. In buffer coordinates the line runs along `(cos, -sin)`.
    pub angle: f64,
    /// Number of parallel lines searched on each side, one pixel apart.
    pub spread: usize,
}

impl LineConstraint {
    pub fn new(point: Point, angle: f64) -> Self {
        Self {
            point,
            angle,
            spread: 0,
        }
    }

    pub fn with_spread(mut self, spread: usize) -> Self {
        self.spread = spread;
        self
    }
}

/// One candidate along a line: the cell offset relative to the search area
/// and the signed position of the segment midpoint along the direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathCell {
    pub offset_x: usize,
    pub offset_y: usize,
    pub position: f64,
}

/// Buffer-space unit direction of `angle`, snapped onto an axis when nearly
/// aligned. Rows grow downward, so the y component is `-sin(angle)`.
pub fn line_direction(angle: f64) -> (f64, f64) {
    let (sin, cos) = angle.sin_cos();
    let tan = (sin / cos).abs();
    if tan > SNAP_TAN_HIGH {
        (0.0, -sin.signum())
    } else if tan < SNAP_TAN_LOW {
        (cos.signum(), 0.0)
    } else {
        (cos, -sin)
    }
}

/// Parameters `(t_min, t_max)` where `point + t * dir` enters and leaves the
/// closed area `[x, x + width] x [y, y + height]`.
///
/// Returns `None` unless the line crosses the boundary at two distinct points.
pub fn clip_line(point: Point, dir: (f64, f64), area: &SearchArea) -> Option<(f64, f64)> {
    let x0 = area.x as f64;
    let y0 = area.y as f64;
    let x1 = x0 + area.width as f64;
    let y1 = y0 + area.height as f64;

    let mut crossings: Vec<f64> = Vec::with_capacity(4);
    let mut try_t = |t: f64| {
        let px = point.x + t * dir.0;
        let py = point.y + t * dir.1;
        let inside = px >= x0 - EPS && px <= x1 + EPS && py >= y0 - EPS && py <= y1 + EPS;
        if t.is_finite() && inside && crossings.iter().all(|c| (c - t).abs() > EPS) {
            crossings.push(t);
        }
    };
    if dir.0 != 0.0 {
        try_t((x0 - point.x) / dir.0);
        try_t((x1 - point.x) / dir.0);
    }
    if dir.1 != 0.0 {
        try_t((y0 - point.y) / dir.1);
        try_t((y1 - point.y) / dir.1);
    }
    if crossings.len() < 2 {
        return None;
    }
    let t_min = crossings.iter().copied().fold(f64::INFINITY, f64::min);
    let t_max = crossings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((t_min, t_max))
}

/// Cells crossed by the line inside `area`, ordered along `dir`.
///
/// Empty when the line misses the area.
pub fn path_cells(point: Point, dir: (f64, f64), area: &SearchArea) -> Vec<PathCell> {
    let Some((t_min, t_max)) = clip_line(point, dir, area) else {
        return Vec::new();
    };

    let mut ts = vec![t_min, t_max];
    grid_crossings(point.x, dir.0, t_min, t_max, &mut ts);
    grid_crossings(point.y, dir.1, t_min, t_max, &mut ts);
    ts.sort_by(f64::total_cmp);
    ts.dedup_by(|b, a| (*b - *a).abs() <= EPS);

    let mut cells: Vec<PathCell> = Vec::with_capacity(ts.len());
    for pair in ts.windows(2) {
        let mid = 0.5 * (pair[0] + pair[1]);
        let offset_x = cell_offset(point.x + mid * dir.0, area.x, area.width);
        let offset_y = cell_offset(point.y + mid * dir.1, area.y, area.height);
        if cells
            .last()
            .is_some_and(|c| (c.offset_x, c.offset_y) == (offset_x, offset_y))
        {
            continue;
        }
        cells.push(PathCell {
            offset_x,
            offset_y,
            position: mid,
        });
    }
    cells
}

/// Appends the parameters where the coordinate `origin + t * step` is an
/// integer, for `t` in `[t_min, t_max]`.
fn grid_crossings(origin: f64, step: f64, t_min: f64, t_max: f64, out: &mut Vec<f64>) {
    if step == 0.0 {
        return;
    }
    let a = origin + t_min * step;
    let b = origin + t_max * step;
    let (lo, hi) = (a.min(b).ceil() as i64, a.max(b).floor() as i64);
    for k in lo..=hi {
        let t = (k as f64 - origin) / step;
        if t > t_min && t < t_max {
            out.push(t);
        }
    }
}

fn cell_offset(coord: f64, start: usize, len: usize) -> usize {
    let offset = (coord - start as f64).floor();
    offset.clamp(0.0, len as f64) as usize
}

/// Order in which parallel lines are visited: 0, -1, +1, -2, +2, ...
fn line_shifts(spread: usize) -> impl Iterator<Item = f64> {
    std::iter::once(0.0).chain((1..=spread).flat_map(|k| [-(k as f64), k as f64]))
}

struct Best {
    line: usize,
    index: usize,
    score: f64,
}

/// Scores every cell along the line (and its parallels) and refines the best.
///
/// Returns `None` when no line crosses the area.
pub(crate) fn line_search(
    window: &TargetWindow,
    plan: &TemplatePlan,
    area: &SearchArea,
    line: &LineConstraint,
    config: &MatchConfig,
) -> Option<Outcome> {
    let dir = line_direction(line.angle);
    let normal = (-dir.1, dir.0);
    let paths: Vec<Vec<PathCell>> = line_shifts(line.spread)
        .map(|k| {
            let shifted = Point::new(line.point.x + k * normal.0, line.point.y + k * normal.1);
            path_cells(shifted, dir, area)
        })
        .collect();

    let mut scores: HashMap<(usize, usize), f64> = HashMap::new();
    let mut best: Option<Best> = None;
    for (line_idx, cells) in paths.iter().enumerate() {
        for (index, cell) in cells.iter().enumerate() {
            let score = *scores.entry((cell.offset_x, cell.offset_y)).or_insert_with(|| {
                DefaultKernel::score_at(
                    window,
                    plan,
                    cell.offset_x as isize,
                    cell.offset_y as isize,
                )
            });
            if best.as_ref().map_or(score.is_finite(), |b| score < b.score) {
                best = Some(Best {
                    line: line_idx,
                    index,
                    score,
                });
            }
        }
    }
    let best = best?;

    let finite: Vec<f64> = scores.values().copied().filter(|s| s.is_finite()).collect();
    let mean = finite.iter().sum::<f64>() / finite.len() as f64;
    let cells = &paths[best.line];
    let cell = cells[best.index];
    trace_event!(
        "line_scan",
        lines = paths.len(),
        cells = scores.len(),
        best_x = cell.offset_x,
        best_y = cell.offset_y,
        min_score = best.score,
        mean_score = mean
    );

    let height = peak_height(mean, best.score);
    let mut outcome = Outcome {
        offset: (cell.offset_x, cell.offset_y),
        delta: (0.0, 0.0),
        peak_height: height,
        peak_width: f64::NAN,
    };
    if !height.is_finite() || best.index == 0 || best.index + 1 == cells.len() {
        return Some(outcome);
    }

    let prev = cells[best.index - 1];
    let next = cells[best.index + 1];
    let score_of = |c: &PathCell| {
        scores
            .get(&(c.offset_x, c.offset_y))
            .copied()
            .unwrap_or(f64::NAN)
    };
    let xs = [
        prev.position - cell.position,
        0.0,
        next.position - cell.position,
    ];
    match fit_peak(
        config.peak_model,
        xs,
        [score_of(&prev), best.score, score_of(&next)],
        mean,
        config.fit_params(),
    ) {
        Some(fit) => {
            outcome.delta = (fit.offset * dir.0, fit.offset * dir.1);
            outcome.peak_width = fit.width;
        }
        None => {
            trace_event!("peak_fit_failed", along_line = true);
        }
    }
    Some(outcome)
}
