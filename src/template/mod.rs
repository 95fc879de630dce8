//! Template construction: blending, masking and trimming.
//!
//! A [`TemplateBuilder`] owns the reference image the template was first cut
//! from, a persistent working image that accumulates weighted blends of new
//! samples and the reference, and the optional mask. Each build composites,
//! masks, trims the transparent border and refreshes the [`TemplatePlan`].

use crate::image::{PixelBuffer, PixelView, Rgba};
use crate::mask::{pixel_inside, Region};
use crate::trace::{trace_event, trace_span};
use crate::util::{TrackMatchError, TrackMatchResult};

mod blend;
mod plan;
mod trim;

pub use plan::TemplatePlan;
pub use trim::{transparent_margins, Margins};

/// Mask shared with the builder; any thread-safe [`Region`].
pub type BoxedRegion = Box<dyn Region + Send + Sync>;

/// A trimmed, masked template ready for matching.
#[derive(Clone, Debug)]
pub struct Template {
    pixels: PixelBuffer,
    plan: TemplatePlan,
    trim_left: usize,
    trim_top: usize,
}

impl Template {
    /// Template width after trimming.
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    /// Template height after trimming.
    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    /// Trimmed template pixels; masked pixels have zero alpha.
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Channel planes used by the scorers.
    pub fn plan(&self) -> &TemplatePlan {
        &self.plan
    }

    /// Columns and rows removed from the left and top of the sample image.
    pub fn trim_offsets(&self) -> (usize, usize) {
        (self.trim_left, self.trim_top)
    }
}

/// Builds and rebuilds the template for one tracked feature.
pub struct TemplateBuilder {
    reference: PixelBuffer,
    working: PixelBuffer,
    mask: Option<BoxedRegion>,
    template: Template,
    weights: (u8, u8),
    scratch: Vec<Rgba>,
}

impl TemplateBuilder {
    /// Creates a builder and cuts the initial template from `reference`.
    pub fn new(reference: PixelBuffer, mask: Option<BoxedRegion>) -> Self {
        let working = reference.transparent_like();
        let template = Template {
            pixels: working.clone(),
            plan: TemplatePlan::default(),
            trim_left: 0,
            trim_top: 0,
        };
        let mut builder = Self {
            reference,
            working,
            mask,
            template,
            weights: (255, 0),
            scratch: Vec::new(),
        };
        builder.rebuild_from_reference();
        builder
    }

    /// Creates a builder whose template keeps only pixels inside `mask`.
    pub fn with_mask<R>(reference: PixelBuffer, mask: R) -> Self
    where
        R: Region + Send + Sync + 'static,
    {
        Self::new(reference, Some(Box::new(mask)))
    }

    /// Rebuilds the template from a new sample blended with the reference.
    ///
    /// The sample is composited over the working image with opacity
    /// `weight_sample`, then the reference with opacity `weight_reference`.
    /// With both weights zero nothing changes and the current template is
    /// returned. Fails with [`TrackMatchError::DimensionMismatch`] when the
    /// sample size differs from the reference.
    pub fn build(
        &mut self,
        sample: PixelView<'_>,
        weight_sample: u8,
        weight_reference: u8,
    ) -> TrackMatchResult<&Template> {
        let (expected_width, expected_height) = self.reference.dimensions();
        if sample.width() != expected_width || sample.height() != expected_height {
            return Err(TrackMatchError::DimensionMismatch {
                expected_width,
                expected_height,
                width: sample.width(),
                height: sample.height(),
            });
        }
        if weight_sample == 0 && weight_reference == 0 {
            return Ok(&self.template);
        }

        let _span = trace_span!("build_template", weight_sample, weight_reference).entered();
        self.weights = (weight_sample, weight_reference);
        blend::composite_over(&mut self.working, sample, weight_sample);
        blend::composite_over(&mut self.working, self.reference.view(), weight_reference);
        self.cut_template()?;
        Ok(&self.template)
    }

    /// Installs a stored template image.
    ///
    /// When `image` has the current template's dimensions its pixels replace the
    /// template in place and the trim offsets are kept. Otherwise `image`
    /// becomes the new reference and the template is rebuilt from scratch.
    pub fn replace_template(&mut self, image: PixelBuffer) {
        if image.dimensions() == self.template.pixels.dimensions() {
            let (width, height) = image.dimensions();
            self.template
                .pixels
                .data_mut()
                .copy_from_slice(image.data());
            if let Err(err) = self.refresh_plan(width, height) {
                report_plan_error(&err);
            }
        } else {
            self.reset(image);
        }
    }

    /// Replaces the reference image and rebuilds the template from scratch.
    pub fn reset(&mut self, reference: PixelBuffer) {
        let (width, height) = reference.dimensions();
        self.working
            .refill_with(width, height, |_, _| Rgba::TRANSPARENT);
        self.reference = reference;
        self.rebuild_from_reference();
    }

    /// Current template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// The original reference image.
    pub fn reference(&self) -> &PixelBuffer {
        &self.reference
    }

    /// `(weight_sample, weight_reference)` of the most recent effective build.
    pub fn weights(&self) -> (u8, u8) {
        self.weights
    }

    /// The blended working image the template is cut from.
    pub fn working_pixels(&self) -> &PixelBuffer {
        &self.working
    }

    /// Restores a working image saved with [`working_pixels`](Self::working_pixels).
    ///
    /// The template itself is not rebuilt until the next [`build`](Self::build).
    pub fn set_working_pixels(&mut self, pixels: PixelBuffer) -> TrackMatchResult<()> {
        let (expected_width, expected_height) = self.reference.dimensions();
        let (width, height) = pixels.dimensions();
        if (width, height) != (expected_width, expected_height) {
            return Err(TrackMatchError::DimensionMismatch {
                expected_width,
                expected_height,
                width,
                height,
            });
        }
        self.working = pixels;
        Ok(())
    }

    /// Returns true when a mask restricts the template.
    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    fn rebuild_from_reference(&mut self) {
        self.weights = (255, 0);
        blend::composite_over(&mut self.working, self.reference.view(), 255);
        if let Err(err) = self.cut_template() {
            report_plan_error(&err);
        }
    }

    /// Masks the working image, trims it and refreshes the template.
    fn cut_template(&mut self) -> TrackMatchResult<()> {
        let (width, height) = self.working.dimensions();
        self.scratch.clear();
        self.scratch.extend_from_slice(self.working.data());
        if let Some(mask) = self.mask.as_deref() {
            for (idx, px) in self.scratch.iter_mut().enumerate() {
                if !pixel_inside(mask, idx % width, idx / width) {
                    *px = Rgba::TRANSPARENT;
                }
            }
        }

        let scratch = &self.scratch;
        match transparent_margins(scratch, width, height) {
            Some(margins) => {
                let (tw, th) = margins.trimmed_size(width, height);
                self.template.pixels.refill_with(tw, th, |x, y| {
                    scratch[(y + margins.top) * width + x + margins.left]
                });
                self.template.trim_left = margins.left;
                self.template.trim_top = margins.top;
                trace_event!(
                    "template_trimmed",
                    width = tw,
                    height = th,
                    trim_left = margins.left,
                    trim_top = margins.top
                );
                self.refresh_plan(tw, th)
            }
            None => {
                // nothing left to keep: the whole sample counts as trimmed
                self.template
                    .pixels
                    .refill_with(1, 1, |_, _| Rgba::TRANSPARENT);
                self.template.trim_left = width;
                self.template.trim_top = height;
                trace_event!(
                    "template_trimmed",
                    width = 1usize,
                    height = 1usize,
                    trim_left = width,
                    trim_top = height
                );
                self.refresh_plan(1, 1)
            }
        }
    }

    fn refresh_plan(&mut self, width: usize, height: usize) -> TrackMatchResult<()> {
        let Template { pixels, plan, .. } = &mut self.template;
        plan.refill(pixels.data(), width, height)
    }
}

/// Plan refills only fail when the template pixels and dimensions disagree.
fn report_plan_error(err: &TrackMatchError) {
    let message = err.to_string();
    trace_event!("template_plan_failed", error = message.as_str());
}

impl std::fmt::Debug for TemplateBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateBuilder")
            .field("reference", &self.reference.dimensions())
            .field("template", &self.template.pixels.dimensions())
            .field("trim", &self.template.trim_offsets())
            .field("weights", &self.weights)
            .field("masked", &self.mask.is_some())
            .finish()
    }
}
