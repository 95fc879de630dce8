//! Convenience helpers for loading and saving pixel buffers via the `image`
//! crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{PixelBuffer, Rgba};
use crate::util::{TrackMatchError, TrackMatchResult};
use std::path::Path;

/// Creates an owned buffer from an RGBA image buffer.
pub fn buffer_from_rgba_image(img: &image::RgbaImage) -> TrackMatchResult<PixelBuffer> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    PixelBuffer::from_rgba_bytes(img.as_raw(), width, height)
}

/// Creates an owned buffer from any decoded image, converting to RGBA.
pub fn buffer_from_dynamic_image(img: &image::DynamicImage) -> TrackMatchResult<PixelBuffer> {
    buffer_from_rgba_image(&img.to_rgba8())
}

/// Converts a buffer into an `image::RgbaImage`.
pub fn buffer_to_rgba_image(buffer: &PixelBuffer) -> TrackMatchResult<image::RgbaImage> {
    let mut raw = Vec::with_capacity(buffer.data().len() * 4);
    for &Rgba { r, g, b, a } in buffer.data() {
        raw.extend_from_slice(&[r, g, b, a]);
    }
    image::RgbaImage::from_raw(buffer.width() as u32, buffer.height() as u32, raw).ok_or(
        TrackMatchError::InvalidDimensions {
            width: buffer.width(),
            height: buffer.height(),
        },
    )
}

/// Loads an image from disk as RGBA.
pub fn load_rgba_image<P: AsRef<Path>>(path: P) -> TrackMatchResult<PixelBuffer> {
    let img = image::open(path).map_err(|err| TrackMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    buffer_from_dynamic_image(&img)
}

/// Writes a buffer to disk as PNG.
pub fn save_png<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> TrackMatchResult<()> {
    let img = buffer_to_rgba_image(buffer)?;
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|err| TrackMatchError::ImageIo {
            reason: err.to_string(),
        })
}
