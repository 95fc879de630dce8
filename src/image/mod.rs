//! RGBA pixel buffers and borrowed views.
//!
//! `PixelBuffer` owns a contiguous row-major grid of [`Rgba`] samples.
//! `PixelView` is a borrowed 2D view with an explicit stride; the stride counts
//! pixels between the starts of consecutive rows, so a stride larger than the
//! width describes padded rows. ROI views share the backing slice and keep the
//! original stride.

use crate::util::{TrackMatchError, TrackMatchResult};

#[cfg(feature = "image-io")]
pub mod io;
mod window;

pub use window::TargetWindow;

/// One 8-bit RGBA sample. A pixel with `a == 0` is transparent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    /// Creates a pixel from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque pixel.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Unpacks a `0xAARRGGBB` value.
    pub const fn from_argb(value: u32) -> Self {
        Self {
            a: (value >> 24) as u8,
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }

    /// Packs into `0xAARRGGBB`.
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Returns the same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Returns true when the alpha channel is zero.
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }
}

/// Owned RGBA image in contiguous row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    /// Wraps a contiguous buffer of exactly `width * height` pixels.
    pub fn new(data: Vec<Rgba>, width: usize, height: usize) -> TrackMatchResult<Self> {
        let needed = area(width, height)?;
        if data.len() != needed {
            return Err(TrackMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a buffer where every pixel equals `pixel`.
    pub fn filled(width: usize, height: usize, pixel: Rgba) -> TrackMatchResult<Self> {
        let len = area(width, height)?;
        Ok(Self {
            data: vec![pixel; len],
            width,
            height,
        })
    }

    /// Creates a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> TrackMatchResult<Self>
    where
        F: FnMut(usize, usize) -> Rgba,
    {
        let len = area(width, height)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a buffer from packed `0xAARRGGBB` values.
    pub fn from_argb(values: &[u32], width: usize, height: usize) -> TrackMatchResult<Self> {
        Self::new(
            values.iter().copied().map(Rgba::from_argb).collect(),
            width,
            height,
        )
    }

    /// Creates an opaque buffer from interleaved RGB bytes.
    pub fn from_rgb_bytes(bytes: &[u8], width: usize, height: usize) -> TrackMatchResult<Self> {
        let needed = area(width, height)?.saturating_mul(3);
        if bytes.len() != needed {
            return Err(TrackMatchError::BufferTooSmall {
                needed,
                got: bytes.len(),
            });
        }
        let data = bytes
            .chunks_exact(3)
            .map(|c| Rgba::opaque(c[0], c[1], c[2]))
            .collect();
        Self::new(data, width, height)
    }

    /// Creates a buffer from interleaved RGBA bytes.
    pub fn from_rgba_bytes(bytes: &[u8], width: usize, height: usize) -> TrackMatchResult<Self> {
        let needed = area(width, height)?.saturating_mul(4);
        if bytes.len() != needed {
            return Err(TrackMatchError::BufferTooSmall {
                needed,
                got: bytes.len(),
            });
        }
        let data = bytes
            .chunks_exact(4)
            .map(|c| Rgba::new(c[0], c[1], c[2], c[3]))
            .collect();
        Self::new(data, width, height)
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the pixels in row-major order.
    pub fn data(&self) -> &[Rgba] {
        &self.data
    }

    /// Returns the pixels mutably in row-major order.
    pub fn data_mut(&mut self) -> &mut [Rgba] {
        &mut self.data
    }

    /// Consumes the buffer and returns its pixels.
    pub fn into_data(self) -> Vec<Rgba> {
        self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Overwrites the pixel at `(x, y)`; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, pixel: Rgba) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = pixel;
        }
    }

    /// Fully transparent buffer with the same dimensions.
    pub(crate) fn transparent_like(&self) -> PixelBuffer {
        PixelBuffer {
            data: vec![Rgba::TRANSPARENT; self.data.len()],
            width: self.width,
            height: self.height,
        }
    }

    /// Refills the buffer with new dimensions, reusing the allocation.
    pub(crate) fn refill_with<F>(&mut self, width: usize, height: usize, mut f: F)
    where
        F: FnMut(usize, usize) -> Rgba,
    {
        debug_assert!(width > 0 && height > 0);
        self.data.clear();
        self.data.reserve(width * height);
        for y in 0..height {
            for x in 0..width {
                self.data.push(f(x, y));
            }
        }
        self.width = width;
        self.height = height;
    }

    /// Packs every pixel into `0xAARRGGBB`.
    pub fn to_argb(&self) -> Vec<u32> {
        self.data.iter().map(|px| px.to_argb()).collect()
    }

    /// Returns a borrowed view of the whole buffer.
    pub fn view(&self) -> PixelView<'_> {
        PixelView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

/// Borrowed RGBA image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct PixelView<'a> {
    data: &'a [Rgba],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> PixelView<'a> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [Rgba], width: usize, height: usize) -> TrackMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(
        data: &'a [Rgba],
        width: usize,
        height: usize,
        stride: usize,
    ) -> TrackMatchResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(TrackMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the view width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the view height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in pixels between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x).copied()
    }

    /// Returns row `y` as a slice of length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [Rgba]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view into the same backing slice.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> TrackMatchResult<PixelView<'a>> {
        if width == 0 || height == 0 {
            return Err(TrackMatchError::InvalidDimensions { width, height });
        }
        let out_of_bounds = TrackMatchError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y * self.stride + x;
        let data = self
            .data
            .get(start..)
            .ok_or(TrackMatchError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;
        PixelView::new(data, width, height, self.stride)
    }

    /// Copies the view into a contiguous owned buffer.
    pub fn to_owned_buffer(&self) -> PixelBuffer {
        let mut data = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            let start = y * self.stride;
            data.extend_from_slice(&self.data[start..start + self.width]);
        }
        PixelBuffer {
            data,
            width: self.width,
            height: self.height,
        }
    }
}

impl<'a> From<&'a PixelBuffer> for PixelView<'a> {
    fn from(buffer: &'a PixelBuffer) -> Self {
        buffer.view()
    }
}

fn area(width: usize, height: usize) -> TrackMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(TrackMatchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(TrackMatchError::InvalidDimensions { width, height })
}

fn required_len(width: usize, height: usize, stride: usize) -> TrackMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(TrackMatchError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(TrackMatchError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(TrackMatchError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::{PixelBuffer, Rgba};

    #[test]
    fn argb_packing_round_trips_channels() {
        let px = Rgba::new(0x12, 0x34, 0x56, 0x78);
        assert_eq!(px.to_argb(), 0x7812_3456);
        assert_eq!(Rgba::from_argb(0x7812_3456), px);
    }

    #[test]
    fn to_owned_buffer_drops_row_padding() {
        let buffer = PixelBuffer::from_fn(4, 3, |x, y| Rgba::opaque(x as u8, y as u8, 0)).unwrap();
        let roi = buffer.view().roi(1, 1, 2, 2).unwrap();
        let owned = roi.to_owned_buffer();
        assert_eq!(owned.dimensions(), (2, 2));
        assert_eq!(owned.get(0, 0), Some(Rgba::opaque(1, 1, 0)));
        assert_eq!(owned.get(1, 1), Some(Rgba::opaque(2, 2, 0)));
    }
}
