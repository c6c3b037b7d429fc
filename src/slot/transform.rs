//! Photo-to-viewport transforms.
//!
//! Two representations exist and are never mixed implicitly:
//!
//! - [`PhotoTransform`] is photo-space: `scale` is zoom relative to a cover
//!   fit (1.0 covers the viewport exactly) and the center is the normalized
//!   photo coordinate shown at the middle of the viewport.
//! - [`ContainerTransform`] is container-space: `scale` maps photo pixels to
//!   viewport pixels and the offset is the photo's top-left corner in
//!   viewport pixels.
//!
//! Converting between them is an explicit call on [`TransformEngine`].

use crate::template::Dimensions;
use crate::util::math::clamp_span;
use crate::util::{HoleMatchError, HoleMatchResult};
use serde::{Deserialize, Serialize};

/// Photo-space transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoTransform {
    pub scale: f32,
    pub center_x: f32,
    pub center_y: f32,
}

/// Container-space transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerTransform {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// A transform bound to a slot, discriminated by its `kind` tag.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transform {
    Photo(PhotoTransform),
    Container(ContainerTransform),
}

/// Source-pixel rectangle of a photo visible through a viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Computes, validates and converts transforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformEngine {
    /// Largest zoom over cover fit a user may reach.
    pub max_zoom: f32,
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self { max_zoom: 8.0 }
    }
}

/// Scale at which `photo` exactly covers `viewport`.
pub fn cover_scale(photo: Dimensions, viewport: Dimensions) -> f32 {
    if photo.width == 0 || photo.height == 0 {
        return 1.0;
    }
    let sx = viewport.width as f32 / photo.width as f32;
    let sy = viewport.height as f32 / photo.height as f32;
    sx.max(sy)
}

impl TransformEngine {
    /// Creates an engine with a custom zoom ceiling.
    pub fn new(max_zoom: f32) -> HoleMatchResult<Self> {
        if !max_zoom.is_finite() || max_zoom < 1.0 {
            return Err(HoleMatchError::InvalidConfig {
                reason: "max_zoom must be finite and >= 1",
            });
        }
        Ok(Self { max_zoom })
    }

    /// Centered cover fit, used when a photo arrives without a transform.
    pub fn default_transform(&self) -> Transform {
        Transform::Photo(PhotoTransform {
            scale: 1.0,
            center_x: 0.5,
            center_y: 0.5,
        })
    }

    /// Validates a user transform and clamps it so the viewport stays covered.
    ///
    /// The variant of the input is preserved.
    pub fn normalize(
        &self,
        transform: Transform,
        photo: Dimensions,
        viewport: Dimensions,
    ) -> HoleMatchResult<Transform> {
        match transform {
            Transform::Photo(t) => {
                check_finite(&[t.scale, t.center_x, t.center_y])?;
                check_scale(t.scale)?;
                Ok(Transform::Photo(self.clamp_photo(t, photo, viewport)))
            }
            Transform::Container(t) => {
                check_finite(&[t.scale, t.offset_x, t.offset_y])?;
                check_scale(t.scale)?;
                Ok(Transform::Container(self.clamp_container(t, photo, viewport)))
            }
        }
    }

    fn clamp_photo(
        &self,
        t: PhotoTransform,
        photo: Dimensions,
        viewport: Dimensions,
    ) -> PhotoTransform {
        let scale = t.scale.clamp(1.0, self.max_zoom);
        let (frac_x, frac_y) = visible_fraction(scale, photo, viewport);
        PhotoTransform {
            scale,
            center_x: clamp_span(t.center_x, frac_x * 0.5, 1.0 - frac_x * 0.5),
            center_y: clamp_span(t.center_y, frac_y * 0.5, 1.0 - frac_y * 0.5),
        }
    }

    fn clamp_container(
        &self,
        t: ContainerTransform,
        photo: Dimensions,
        viewport: Dimensions,
    ) -> ContainerTransform {
        let cover = cover_scale(photo, viewport);
        let scale = t.scale.clamp(cover, cover * self.max_zoom);
        let drawn_w = photo.width as f32 * scale;
        let drawn_h = photo.height as f32 * scale;
        ContainerTransform {
            scale,
            offset_x: clamp_span(t.offset_x, viewport.width as f32 - drawn_w, 0.0),
            offset_y: clamp_span(t.offset_y, viewport.height as f32 - drawn_h, 0.0),
        }
    }

    /// Converts a photo-space transform into container space.
    pub fn to_container(
        &self,
        t: PhotoTransform,
        photo: Dimensions,
        viewport: Dimensions,
    ) -> ContainerTransform {
        let scale = cover_scale(photo, viewport) * t.scale;
        ContainerTransform {
            scale,
            offset_x: viewport.width as f32 * 0.5 - t.center_x * photo.width as f32 * scale,
            offset_y: viewport.height as f32 * 0.5 - t.center_y * photo.height as f32 * scale,
        }
    }

    /// Converts a container-space transform into photo space.
    pub fn to_photo(
        &self,
        t: ContainerTransform,
        photo: Dimensions,
        viewport: Dimensions,
    ) -> PhotoTransform {
        let cover = cover_scale(photo, viewport);
        let drawn_w = (photo.width as f32 * t.scale).max(f32::EPSILON);
        let drawn_h = (photo.height as f32 * t.scale).max(f32::EPSILON);
        PhotoTransform {
            scale: t.scale / cover,
            center_x: (viewport.width as f32 * 0.5 - t.offset_x) / drawn_w,
            center_y: (viewport.height as f32 * 0.5 - t.offset_y) / drawn_h,
        }
    }

    /// Returns the region of the photo, in photo pixels, that the viewport shows.
    pub fn visible_rect(
        &self,
        transform: Transform,
        photo: Dimensions,
        viewport: Dimensions,
    ) -> VisibleRect {
        let t = match transform {
            Transform::Container(t) => t,
            Transform::Photo(t) => self.to_container(t, photo, viewport),
        };
        let scale = t.scale.max(f32::EPSILON);
        VisibleRect {
            x: -t.offset_x / scale,
            y: -t.offset_y / scale,
            width: viewport.width as f32 / scale,
            height: viewport.height as f32 / scale,
        }
    }
}

/// Fraction of the photo's width and height visible at `zoom` over cover fit.
fn visible_fraction(zoom: f32, photo: Dimensions, viewport: Dimensions) -> (f32, f32) {
    if photo.width == 0 || photo.height == 0 {
        return (1.0, 1.0);
    }
    let scale = cover_scale(photo, viewport) * zoom;
    let frac_x = viewport.width as f32 / (photo.width as f32 * scale);
    let frac_y = viewport.height as f32 / (photo.height as f32 * scale);
    (frac_x.min(1.0), frac_y.min(1.0))
}

fn check_finite(values: &[f32]) -> HoleMatchResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(HoleMatchError::InvalidTransform {
            reason: "non-finite transform component",
        })
    }
}

fn check_scale(scale: f32) -> HoleMatchResult<()> {
    if scale > 0.0 {
        Ok(())
    } else {
        Err(HoleMatchError::InvalidTransform {
            reason: "scale must be > 0",
        })
    }
}
