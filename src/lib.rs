//! TrackMatch is a masked RGB template matcher for video point tracking.
//!
//! A [`Matcher`] cuts a trimmed, optionally masked template from a sample
//! image, searches a rectangle (or a line through it) of each target frame by
//! sum of squared RGB differences, and refines the best integer offset to
//! sub-pixel accuracy with a three-point peak fit. Every result carries a
//! peak height and width so callers can decide whether to trust it.
//!
//! Optional features: `rayon` (parallel rectangle scans), `simd` (8-lane
//! scorer), `image-io` (load/save via the `image` crate) and `tracing`.

pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod mask;
pub mod refine;
pub mod search;
pub mod template;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::{PixelBuffer, PixelView, Rgba, TargetWindow};
pub use mask::{pixel_inside, EllipseRegion, PolygonRegion, RectRegion, Region};
pub use refine::{PeakFit, PeakModel};
pub use search::{
    LineConstraint, MatchConfig, MatchResult, Matcher, Point, SearchKind, SearchRect,
    USABLE_PEAK_HEIGHT,
};
pub use template::{BoxedRegion, Template, TemplateBuilder};
pub use util::{TrackMatchError, TrackMatchResult};
