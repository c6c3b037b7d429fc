//! Convenience helpers for decoding PNG rasters via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::RgbaImage;
use crate::util::{HoleMatchError, HoleMatchResult};
use ::image::ImageFormat;
use std::path::Path;

/// Creates an owned image from an `image` RGBA buffer.
pub fn owned_from_rgba_image(img: &::image::RgbaImage) -> HoleMatchResult<RgbaImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    RgbaImage::new(img.as_raw().clone(), width, height)
}

/// Decodes PNG bytes into an owned RGBA image.
pub fn decode_png(bytes: &[u8]) -> HoleMatchResult<RgbaImage> {
    let img = ::image::load_from_memory_with_format(bytes, ImageFormat::Png).map_err(|err| {
        HoleMatchError::DecodeFailure {
            reason: err.to_string(),
        }
    })?;
    owned_from_rgba_image(&img.to_rgba8())
}

/// Reads a PNG file from disk and decodes it into an owned RGBA image.
pub fn load_png<P: AsRef<Path>>(path: P) -> HoleMatchResult<RgbaImage> {
    let bytes = std::fs::read(path).map_err(|err| HoleMatchError::DecodeFailure {
        reason: err.to_string(),
    })?;
    decode_png(&bytes)
}
