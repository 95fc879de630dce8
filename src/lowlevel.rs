//! Low-level building blocks for custom matching pipelines.
//!
//! These expose the scorers, template planes, peak fits and path geometry
//! behind the high-level [`Matcher`](crate::Matcher). Most users should prefer
//! `Matcher`.

pub use crate::kernel::scalar::ScalarKernel;
#[cfg(feature = "simd")]
pub use crate::kernel::simd::SimdKernel;
#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::scan_grid_par;
pub use crate::kernel::{DefaultKernel, GridScan, Kernel};
pub use crate::refine::{
    fit_gaussian_3, fit_parabola_3, fit_peak, gaussian_warm_start, refine_cross, CrossFit,
    FitParams, GaussianStart,
};
pub use crate::search::area::{clamp_search_rect, Insets, SearchArea};
pub use crate::search::path::{clip_line, line_direction, path_cells, PathCell};
pub use crate::template::{transparent_margins, Margins, TemplatePlan};
