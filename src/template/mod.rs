//! Template definitions built from detected holes.
//!
//! A `TemplateDefinition` is immutable once built; rebuilding produces a new
//! value rather than editing the old one.

pub mod classify;
pub mod order;

use crate::util::math::aspect_ratio;
use serde::{Deserialize, Serialize};

pub use classify::classify;
pub use order::{sort_row_major, DEFAULT_ROW_BAND};

/// A rectangular photo placement in source-image pixel space.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hole {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Hole {
    /// Creates a hole from its id and top-left extent.
    pub fn new(id: impl Into<String>, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// Rightmost covered column.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width.saturating_sub(1))
    }

    /// Bottom covered row.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height.saturating_sub(1))
    }

    /// Returns true if the two holes share at least one pixel.
    pub fn overlaps(&self, other: &Hole) -> bool {
        !(self.right() < other.x
            || other.right() < self.x
            || self.bottom() < other.y
            || other.bottom() < self.y)
    }

    /// Returns `width / height`.
    pub fn aspect_ratio(&self) -> f32 {
        aspect_ratio(self.width, self.height)
    }

    /// Returns the hole size.
    pub fn size(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }
}

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Creates dimensions from width and height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Coarse layout category of a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Solo,
    Collage,
    Card,
    Strip,
}

impl TemplateType {
    /// Card and strip layouts carry printed branding inside the template art.
    pub fn has_internal_branding(self) -> bool {
        matches!(self, Self::Card | Self::Strip)
    }
}

/// Caller-supplied identity of a template being built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateMeta {
    /// Template id, stable for the source image.
    pub id: String,
    /// Product print size label, e.g. `4x6`.
    pub print_size: String,
    /// Optional source filename, used as a classification hint.
    pub name: Option<String>,
}

/// Immutable, validated description of a template and its holes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    pub id: String,
    pub print_size: String,
    pub template_type: TemplateType,
    /// Holes in row-major order with ids `hole_1..hole_N`.
    pub holes: Vec<Hole>,
    pub dimensions: Dimensions,
    pub has_internal_branding: bool,
}

impl TemplateDefinition {
    /// Sorts, renumbers and classifies `holes` into a definition.
    pub fn build(
        meta: TemplateMeta,
        dimensions: Dimensions,
        mut holes: Vec<Hole>,
        row_band: u32,
    ) -> Self {
        sort_row_major(&mut holes, row_band);
        order::renumber(&mut holes);
        let template_type = classify(&holes, meta.name.as_deref());
        Self {
            id: meta.id,
            print_size: meta.print_size,
            template_type,
            holes,
            dimensions,
            has_internal_branding: template_type.has_internal_branding(),
        }
    }

    /// Number of holes, which is also the slot count of every group using it.
    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }
}
