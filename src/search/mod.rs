//! Template search and match assembly.
//!
//! [`Matcher`] owns the template builder, a reusable target window and the
//! diagnostics of the most recent search. Searches never fail: degenerate
//! geometry is reported through [`MatchResult`] sentinels.

pub mod area;
pub(crate) mod grid;
pub mod path;
pub(crate) mod preview;

pub use area::{clamp_search_rect, Insets, Point, SearchArea, SearchRect};
pub use path::LineConstraint;

use crate::image::{PixelBuffer, PixelView, TargetWindow};
use crate::mask::Region;
use crate::refine::{FitParams, PeakModel};
use crate::template::{BoxedRegion, Template, TemplateBuilder};
use crate::trace::{trace_event, trace_span};
use crate::util::TrackMatchResult;

/// Conventional minimum peak height of a trustworthy match.
///
/// The matcher reports heights; callers decide what to accept.
pub const USABLE_PEAK_HEIGHT: f64 = 5.0;

/// Search configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchConfig {
    /// Curve fitted around the best offset.
    pub peak_model: PeakModel,
    /// Scan rectangles in parallel (requires the `rayon` feature).
    pub parallel: bool,
    /// Maximum RMS residual of an iterative Gaussian fit.
    pub fit_tolerance: f64,
    /// Iteration budget of an iterative Gaussian fit.
    pub fit_max_iterations: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        let fit = FitParams::default();
        Self {
            peak_model: PeakModel::default(),
            parallel: false,
            fit_tolerance: fit.tolerance,
            fit_max_iterations: fit.max_iterations,
        }
    }
}

impl MatchConfig {
    pub(crate) fn fit_params(&self) -> FitParams {
        FitParams {
            tolerance: self.fit_tolerance,
            max_iterations: self.fit_max_iterations,
        }
    }
}

/// Which search produced a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchKind {
    Grid,
    Line,
}

/// Outcome of one search.
#[derive(Clone, Debug)]
pub struct MatchResult {
    /// Top-left of the untrimmed sample image in target coordinates.
    pub location: Option<Point>,
    /// `mean / min - 1`: `+inf` for a perfect match, NaN for no match.
    pub peak_height: f64,
    /// Fitted peak width; NaN without a reliable fit or for an empty search
    /// area, negative when a line search found no crossing with the area.
    pub peak_width: f64,
    /// Target patch under the template at the integer match.
    pub preview: Option<PixelBuffer>,
    pub kind: SearchKind,
}

impl MatchResult {
    fn no_match(kind: SearchKind) -> Self {
        Self {
            location: None,
            peak_height: f64::NAN,
            peak_width: f64::NAN,
            preview: None,
            kind,
        }
    }

    /// No line crossed the clamped search area.
    fn line_missed() -> Self {
        Self {
            peak_width: -1.0,
            ..Self::no_match(SearchKind::Line)
        }
    }

    /// Returns true when the search produced a location.
    pub fn is_match(&self) -> bool {
        self.location.is_some()
    }

    /// Returns true for a match whose peak height reaches `threshold`.
    pub fn is_usable(&self, threshold: f64) -> bool {
        self.is_match() && self.peak_height >= threshold
    }
}

/// Raw search result in window coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Outcome {
    pub(crate) offset: (usize, usize),
    pub(crate) delta: (f64, f64),
    pub(crate) peak_height: f64,
    pub(crate) peak_width: f64,
}

/// Locates one template in successive target frames.
///
/// # Example
/// ```
/// use trackmatch::{Matcher, PixelBuffer, Rgba, SearchRect};
///
/// # fn main() -> Result<(), trackmatch::TrackMatchError> {
/// let target = PixelBuffer::from_fn(32, 32, |x, y| {
///     Rgba::opaque((x * 7) as u8, (y * 5) as u8, ((x * y) % 251) as u8)
/// })?;
/// let sample = target.view().roi(12, 9, 6, 6)?.to_owned_buffer();
/// let mut matcher = Matcher::new(sample, None);
/// let result = matcher.find_match(target.view(), SearchRect::new(8, 8, 16, 16));
/// let location = result.location.unwrap();
/// assert_eq!((location.x, location.y), (12.0, 9.0));
/// assert!(result.peak_height.is_infinite());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Matcher {
    builder: TemplateBuilder,
    config: MatchConfig,
    window: TargetWindow,
    last_preview: Option<PixelBuffer>,
    last_peak: (f64, f64),
}

impl Matcher {
    /// Creates a matcher whose template is cut from `reference`.
    pub fn new(reference: PixelBuffer, mask: Option<BoxedRegion>) -> Self {
        Self {
            builder: TemplateBuilder::new(reference, mask),
            config: MatchConfig::default(),
            window: TargetWindow::new(),
            last_preview: None,
            last_peak: (f64::NAN, f64::NAN),
        }
    }

    /// Creates a matcher whose template keeps only pixels inside `mask`.
    pub fn with_mask<R>(reference: PixelBuffer, mask: R) -> Self
    where
        R: Region + Send + Sync + 'static,
    {
        Self::new(reference, Some(Box::new(mask)))
    }

    /// Replaces the search configuration.
    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Current template.
    pub fn template(&self) -> &Template {
        self.builder.template()
    }

    pub fn builder(&self) -> &TemplateBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut TemplateBuilder {
        &mut self.builder
    }

    /// Rebuilds the template; see [`TemplateBuilder::build`].
    pub fn build_template(
        &mut self,
        sample: PixelView<'_>,
        weight_sample: u8,
        weight_reference: u8,
    ) -> TrackMatchResult<&Template> {
        self.builder.build(sample, weight_sample, weight_reference)
    }

    /// Installs a stored template image; see [`TemplateBuilder::replace_template`].
    pub fn set_template(&mut self, image: PixelBuffer) {
        self.builder.replace_template(image);
    }

    /// Searches every template center in `rect`.
    pub fn find_match(&mut self, target: PixelView<'_>, rect: SearchRect) -> MatchResult {
        let _span = trace_span!(
            "grid_search",
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height
        )
        .entered();
        let Some(area) = self.prepare(target, rect) else {
            return self.finish_no_match(SearchKind::Grid);
        };
        let outcome = grid::grid_search(
            &self.window,
            self.builder.template().plan(),
            area.width,
            area.height,
            &self.config,
        );
        self.assemble(&area, outcome, SearchKind::Grid)
    }

    /// Searches the template centers in `rect` that lie along `line`.
    pub fn find_match_along_line(
        &mut self,
        target: PixelView<'_>,
        rect: SearchRect,
        line: LineConstraint,
    ) -> MatchResult {
        let _span = trace_span!("line_search", angle = line.angle, spread = line.spread).entered();
        let Some(area) = self.prepare(target, rect) else {
            return self.finish_no_match(SearchKind::Line);
        };
        let outcome = path::line_search(
            &self.window,
            self.builder.template().plan(),
            &area,
            &line,
            &self.config,
        );
        if outcome.is_none() {
            return self.finish(MatchResult::line_missed());
        }
        self.assemble(&area, outcome, SearchKind::Line)
    }

    /// Preview patch of the most recent successful search.
    pub fn last_preview(&self) -> Option<&PixelBuffer> {
        self.last_preview.as_ref()
    }

    /// `(peak_width, peak_height)` of the most recent search.
    pub fn last_peak(&self) -> (f64, f64) {
        self.last_peak
    }

    /// Clamps `rect` and loads the target window it needs.
    fn prepare(&mut self, target: PixelView<'_>, rect: SearchRect) -> Option<SearchArea> {
        let template = self.builder.template();
        let insets = Insets::for_template(template.width(), template.height());
        let area = clamp_search_rect(rect, target.width(), target.height(), insets)?;
        let (wx, wy) = area.window_origin();
        let (ww, wh) = area.window_size();
        self.window.fill(target, wx, wy, ww, wh).ok()?;
        Some(area)
    }

    fn assemble(
        &mut self,
        area: &SearchArea,
        outcome: Option<Outcome>,
        kind: SearchKind,
    ) -> MatchResult {
        let Some(outcome) = outcome else {
            return self.finish_no_match(kind);
        };
        let template = self.builder.template();
        let (trim_left, trim_top) = template.trim_offsets();
        let (ox, oy) = outcome.offset;
        // window offset -> target top-left of the trimmed template -> sample origin
        let x = (ox + area.x) as f64 - area.insets.left as f64 - trim_left as f64;
        let y = (oy + area.y) as f64 - area.insets.top as f64 - trim_top as f64;

        let preview = preview::render_preview(&self.window, template, outcome.offset);
        self.last_preview.clone_from(&preview);
        self.last_peak = (outcome.peak_width, outcome.peak_height);
        MatchResult {
            location: Some(Point::new(x + outcome.delta.0, y + outcome.delta.1)),
            peak_height: outcome.peak_height,
            peak_width: outcome.peak_width,
            preview,
            kind,
        }
    }

    fn finish_no_match(&mut self, kind: SearchKind) -> MatchResult {
        self.finish(MatchResult::no_match(kind))
    }

    fn finish(&mut self, result: MatchResult) -> MatchResult {
        trace_event!(
            "no_match",
            line = (result.kind == SearchKind::Line),
            peak_width = result.peak_width
        );
        self.last_peak = (result.peak_width, result.peak_height);
        result
    }
}
