//! Reserved marker colors and per-pixel matching.

use crate::util::math::channel_close;
use serde::{Deserialize, Serialize};

/// Pure magenta, the primary hole marker.
pub const MAGENTA: ReservedColor = ReservedColor::new(255, 0, 255);

/// Magenta after a round trip through a CMYK print profile.
pub const MAGENTA_CMYK: ReservedColor = ReservedColor::new(236, 0, 140);

/// An RGB value reserved for marking holes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ReservedColor {
    /// Creates a reserved color from its RGB channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn matches_rgb(&self, px: [u8; 4], tolerance: u8) -> bool {
        channel_close(px[0], self.r, tolerance)
            && channel_close(px[1], self.g, tolerance)
            && channel_close(px[2], self.b, tolerance)
    }
}

/// Palette of reserved colors with a shared tolerance and visibility threshold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedPalette {
    colors: Vec<ReservedColor>,
    tolerance: u8,
    alpha_threshold: u8,
}

impl ReservedPalette {
    /// Creates a palette; an empty color list matches nothing.
    pub fn new(colors: Vec<ReservedColor>, tolerance: u8, alpha_threshold: u8) -> Self {
        Self {
            colors,
            tolerance,
            alpha_threshold,
        }
    }

    /// Returns the reserved colors.
    pub fn colors(&self) -> &[ReservedColor] {
        &self.colors
    }

    /// Returns the per-channel tolerance.
    pub fn tolerance(&self) -> u8 {
        self.tolerance
    }

    /// Returns the minimum alpha a marker pixel must have.
    pub fn alpha_threshold(&self) -> u8 {
        self.alpha_threshold
    }

    /// Returns true if the pixel is visible and close to any reserved color.
    #[inline]
    pub fn matches(&self, px: [u8; 4]) -> bool {
        if px[3] < self.alpha_threshold {
            return false;
        }
        self.colors
            .iter()
            .any(|color| color.matches_rgb(px, self.tolerance))
    }
}

impl Default for ReservedPalette {
    fn default() -> Self {
        Self::new(vec![MAGENTA, MAGENTA_CMYK], 15, 128)
    }
}
