//! RGBA raster views.
//!
//! `RgbaView` is a borrowed 2D view into an interleaved RGBA8 byte buffer.
//! The stride counts pixels between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows.

use crate::util::{HoleMatchError, HoleMatchResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 4;

/// Borrowed RGBA8 image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct RgbaView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> RgbaView<'a> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> HoleMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride in pixels.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) -> HoleMatchResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(HoleMatchError::BufferTooSmall {
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

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in pixels between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the `[r, g, b, a]` pixel at `(x, y)` if it is within bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.stride + x) * CHANNELS;
        let px = self.data.get(idx..idx + CHANNELS)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Returns the bytes of row `y`, `width * 4` long.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?.checked_mul(CHANNELS)?;
        let end = start.checked_add(self.width * CHANNELS)?;
        self.data.get(start..end)
    }
}

/// Owned contiguous RGBA8 image buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl RgbaImage {
    /// Creates an owned image from a contiguous buffer of exactly `width * height * 4` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> HoleMatchResult<Self> {
        let needed = required_len(width, height, width)?;
        if data.len() < needed {
            return Err(HoleMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(HoleMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image filled with a single color.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> HoleMatchResult<Self> {
        let needed = required_len(width, height, width)?;
        let data = rgba.iter().copied().cycle().take(needed).collect();
        Self::new(data, width, height)
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the raw interleaved bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Overwrites the pixel at `(x, y)`; out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) * CHANNELS;
        self.data[idx..idx + CHANNELS].copy_from_slice(&rgba);
    }

    /// Fills the axis-aligned rectangle, clipped to the image.
    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, rgba: [u8; 4]) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for yy in y..y_end {
            for xx in x..x_end {
                self.put_pixel(xx, yy, rgba);
            }
        }
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> RgbaView<'_> {
        RgbaView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> HoleMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(HoleMatchError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(HoleMatchError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .and_then(|v| v.checked_mul(CHANNELS))
        .ok_or(HoleMatchError::InvalidDimensions { width, height })
}
