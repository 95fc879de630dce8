//! Channel planes precomputed for the scorers.

use crate::image::Rgba;
use crate::util::{TrackMatchError, TrackMatchResult};

/// Template pixels split into flat planes for allocation-free scoring.
///
/// Every plane has exactly `width * height` entries in row-major order.
/// [`TemplatePlan::refill`] keeps the allocations and only grows them when a
/// larger template arrives.
#[derive(Clone, Debug, Default)]
pub struct TemplatePlan {
    width: usize,
    height: usize,
    red: Vec<i32>,
    green: Vec<i32>,
    blue: Vec<i32>,
    weight: Vec<i32>,
    transparent: Vec<bool>,
    opaque_count: usize,
}

impl TemplatePlan {
    /// Builds a plan from row-major template pixels.
    pub fn from_pixels(pixels: &[Rgba], width: usize, height: usize) -> TrackMatchResult<Self> {
        let mut plan = Self::default();
        plan.refill(pixels, width, height)?;
        Ok(plan)
    }

    /// Replaces the plan contents, reusing the existing storage.
    pub fn refill(&mut self, pixels: &[Rgba], width: usize, height: usize) -> TrackMatchResult<()> {
        if width == 0 || height == 0 {
            return Err(TrackMatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(TrackMatchError::InvalidDimensions { width, height })?;
        if pixels.len() != needed {
            return Err(TrackMatchError::BufferTooSmall {
                needed,
                got: pixels.len(),
            });
        }

        self.red.clear();
        self.green.clear();
        self.blue.clear();
        self.weight.clear();
        self.transparent.clear();
        self.opaque_count = 0;
        for px in pixels {
            let transparent = px.is_transparent();
            self.red.push(px.r as i32);
            self.green.push(px.g as i32);
            self.blue.push(px.b as i32);
            self.weight.push(i32::from(!transparent));
            self.transparent.push(transparent);
            self.opaque_count += usize::from(!transparent);
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `width * height`.
    pub fn area(&self) -> usize {
        self.red.len()
    }

    /// Red channel plane.
    pub fn red(&self) -> &[i32] {
        &self.red
    }

    /// Green channel plane.
    pub fn green(&self) -> &[i32] {
        &self.green
    }

    /// Blue channel plane.
    pub fn blue(&self) -> &[i32] {
        &self.blue
    }

    /// 1 for scored pixels, 0 for transparent ones.
    pub fn weight(&self) -> &[i32] {
        &self.weight
    }

    /// Transparency flags, parallel to the channel planes.
    pub fn transparent(&self) -> &[bool] {
        &self.transparent
    }

    /// Number of pixels that contribute to the score.
    pub fn opaque_count(&self) -> usize {
        self.opaque_count
    }

    /// Allocated capacity of the channel planes.
    pub fn capacity(&self) -> usize {
        self.red.capacity()
    }
}
