//! Assignable slots derived from template holes.
//!
//! One slot exists per hole. A slot is either empty or holds an
//! [`Assignment`], which pairs a photo id with its transform, so a slot can
//! never carry a transform without a photo or a photo without a transform.

pub mod transform;

use crate::template::{Dimensions, TemplateDefinition};
use crate::util::{HoleMatchError, HoleMatchResult};
use serde::{Deserialize, Serialize};

pub use transform::{ContainerTransform, PhotoTransform, Transform, TransformEngine};

/// A photograph supplied by an external collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    /// Opaque reference to the pixel source.
    pub source: String,
    pub display_name: String,
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
}

impl Photo {
    /// Natural size of the photo.
    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// A photo bound to a slot together with its placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub photo_id: String,
    /// Natural size of the bound photo, kept for later re-normalization.
    pub photo_size: Dimensions,
    pub transform: Transform,
}

/// Runtime counterpart of a hole within one template group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSlot {
    pub id: String,
    pub template_group_id: String,
    pub slot_index: usize,
    /// Size of the hole this slot fills.
    pub viewport: Dimensions,
    pub assignment: Option<Assignment>,
}

impl TemplateSlot {
    /// Bound photo id, if any.
    pub fn photo_id(&self) -> Option<&str> {
        self.assignment.as_ref().map(|a| a.photo_id.as_str())
    }

    /// Bound transform, if any.
    pub fn transform(&self) -> Option<&Transform> {
        self.assignment.as_ref().map(|a| &a.transform)
    }

    /// True when no photo is bound.
    pub fn is_empty(&self) -> bool {
        self.assignment.is_none()
    }
}

/// Deterministic slot id for a group and index.
pub fn slot_id(group_id: &str, slot_index: usize) -> String {
    format!("{group_id}:slot_{slot_index}")
}

/// Creates one empty slot per hole, in hole order.
pub fn instantiate(definition: &TemplateDefinition, group_id: &str) -> Vec<TemplateSlot> {
    definition
        .holes
        .iter()
        .enumerate()
        .map(|(slot_index, hole)| TemplateSlot {
            id: slot_id(group_id, slot_index),
            template_group_id: group_id.to_owned(),
            slot_index,
            viewport: hole.size(),
            assignment: None,
        })
        .collect()
}

/// True when every slot has a photo. An empty collection is not complete.
pub fn is_complete(slots: &[TemplateSlot]) -> bool {
    !slots.is_empty() && slots.iter().all(|s| !s.is_empty())
}

/// First slot without a photo.
pub fn first_empty(slots: &[TemplateSlot]) -> Option<&TemplateSlot> {
    slots.iter().find(|s| s.is_empty())
}

/// One instantiated template placement: a print and its slots.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateGroup {
    pub id: String,
    pub template: TemplateDefinition,
    pub slots: Vec<TemplateSlot>,
}

impl TemplateGroup {
    /// Creates a group with fresh empty slots.
    pub fn new(id: impl Into<String>, template: TemplateDefinition) -> Self {
        let id = id.into();
        let slots = instantiate(&template, &id);
        Self {
            id,
            template,
            slots,
        }
    }

    /// Pairs a template with an existing slot list, which must match its hole count.
    pub fn from_parts(
        id: impl Into<String>,
        template: TemplateDefinition,
        slots: Vec<TemplateSlot>,
    ) -> HoleMatchResult<Self> {
        if slots.len() != template.hole_count() {
            return Err(HoleMatchError::HoleCountMismatch {
                expected: template.hole_count(),
                actual: slots.len(),
            });
        }
        Ok(Self {
            id: id.into(),
            template,
            slots,
        })
    }

    /// True when every slot in the group has a photo.
    pub fn is_complete(&self) -> bool {
        is_complete(&self.slots)
    }
}
