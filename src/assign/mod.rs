//! Slot selection, photo binding and template replacement.
//!
//! Every operation takes the current collection by reference and returns a
//! new one; nothing is edited in place. Callers apply results against the
//! latest collection they hold and serialize writers to the same slots.

mod session;

pub use session::{Action, Session};

use crate::registry::TemplateRegistry;
use crate::slot::{first_empty, is_complete, Assignment, Photo, TemplateSlot, Transform};
use crate::slot::{TemplateGroup, TransformEngine};
use crate::template::TemplateDefinition;
use crate::util::{HoleMatchError, HoleMatchResult};

/// A selected slot within a group.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub group_id: String,
    pub slot_id: String,
}

impl SlotRef {
    fn of(slot: &TemplateSlot) -> Self {
        Self {
            group_id: slot.template_group_id.clone(),
            slot_id: slot.id.clone(),
        }
    }
}

/// Where selection should go after a slot was filled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoAdvance {
    /// First empty slot of the same group, if any.
    pub next: Option<SlotRef>,
    /// Every slot of the group now holds a photo.
    pub group_complete: bool,
}

impl AutoAdvance {
    /// Selection under the clean-view policy: nothing is selected once the group is complete.
    pub fn selection(&self) -> Option<SlotRef> {
        if self.group_complete {
            None
        } else {
            self.next.clone()
        }
    }
}

/// Orchestrates photo assignment over caller-owned slot collections.
#[derive(Clone, Copy, Debug)]
pub struct AssignmentController<'r> {
    registry: &'r TemplateRegistry,
    transforms: TransformEngine,
}

impl<'r> AssignmentController<'r> {
    /// Creates a controller resolving template ids through `registry`.
    pub fn new(registry: &'r TemplateRegistry) -> Self {
        Self {
            registry,
            transforms: TransformEngine::default(),
        }
    }

    /// Replaces the transform engine.
    pub fn with_transforms(mut self, transforms: TransformEngine) -> Self {
        self.transforms = transforms;
        self
    }

    /// Returns the injected registry.
    pub fn registry(&self) -> &'r TemplateRegistry {
        self.registry
    }

    /// Returns the transform engine.
    pub fn transforms(&self) -> &TransformEngine {
        &self.transforms
    }

    /// Selects a slot by id.
    pub fn select_slot(&self, slots: &[TemplateSlot], slot_id: &str) -> HoleMatchResult<SlotRef> {
        find_slot(slots, slot_id).map(|(_, slot)| SlotRef::of(slot))
    }

    /// Binds `photo` to a slot and returns the updated collection.
    ///
    /// Without an explicit transform the slot's existing transform is kept,
    /// falling back to a centered cover fit for an empty slot. An explicit
    /// transform is normalized against the photo and the slot viewport.
    pub fn apply_photo(
        &self,
        slots: &[TemplateSlot],
        slot_id: &str,
        photo: &Photo,
        transform: Option<Transform>,
    ) -> HoleMatchResult<Vec<TemplateSlot>> {
        let (idx, slot) = find_slot(slots, slot_id)?;
        let transform = match transform {
            Some(t) => self.transforms.normalize(t, photo.size(), slot.viewport)?,
            None => slot
                .transform()
                .copied()
                .unwrap_or_else(|| self.transforms.default_transform()),
        };

        let mut out = slots.to_vec();
        out[idx].assignment = Some(Assignment {
            photo_id: photo.id.clone(),
            photo_size: photo.size(),
            transform,
        });
        Ok(out)
    }

    /// Computes the next selection after `just_filled` received a photo.
    ///
    /// Only slots of the same group are considered, so `slots` may be one
    /// group or several groups concatenated.
    pub fn auto_advance(
        &self,
        slots: &[TemplateSlot],
        just_filled: &str,
    ) -> HoleMatchResult<AutoAdvance> {
        let (_, filled) = find_slot(slots, just_filled)?;
        let group: Vec<TemplateSlot> = slots
            .iter()
            .filter(|s| s.template_group_id == filled.template_group_id)
            .cloned()
            .collect();
        Ok(AutoAdvance {
            next: first_empty(&group).map(SlotRef::of),
            group_complete: is_complete(&group),
        })
    }

    /// Clears the photo and transform of a slot; an already-empty slot is left as is.
    pub fn remove_photo(
        &self,
        slots: &[TemplateSlot],
        slot_id: &str,
    ) -> HoleMatchResult<Vec<TemplateSlot>> {
        let (idx, _) = find_slot(slots, slot_id)?;
        let mut out = slots.to_vec();
        out[idx].assignment = None;
        Ok(out)
    }

    /// Swaps the template of the `group_index`-th group, keeping photos by slot position.
    ///
    /// The new group gets one slot per hole of `definition`. Slot `i` takes
    /// the assignment of old slot `i` when it existed; surplus old photos are
    /// dropped and surplus new slots start empty. The group id is kept, so
    /// repeating the call with the same arguments yields the same session.
    pub fn replace_template_at_position(
        &self,
        session: &Session,
        group_index: usize,
        definition: &TemplateDefinition,
    ) -> HoleMatchResult<Session> {
        let old = session
            .groups
            .get(group_index)
            .ok_or(HoleMatchError::GroupIndexOutOfRange {
                index: group_index,
                len: session.groups.len(),
            })?;

        let mut replacement = TemplateGroup::new(old.id.clone(), definition.clone());
        for (new_slot, old_slot) in replacement.slots.iter_mut().zip(&old.slots) {
            new_slot.assignment = old_slot.assignment.clone();
        }

        let selection = session.selection.clone().filter(|sel| {
            sel.group_id != replacement.id || replacement.slots.iter().any(|s| s.id == sel.slot_id)
        });

        let mut groups = session.groups.clone();
        groups[group_index] = replacement;
        Ok(Session { groups, selection })
    }

    /// Applies one action to a session and returns the resulting session.
    pub fn reduce(&self, session: &Session, action: Action) -> HoleMatchResult<Session> {
        session::reduce(self, session, action)
    }

    fn template(&self, template_id: &str) -> HoleMatchResult<&'r TemplateDefinition> {
        self.registry
            .template(template_id)
            .ok_or_else(|| HoleMatchError::TemplateNotFound {
                template_id: template_id.to_owned(),
            })
    }
}

fn find_slot<'a>(
    slots: &'a [TemplateSlot],
    slot_id: &str,
) -> HoleMatchResult<(usize, &'a TemplateSlot)> {
    slots
        .iter()
        .enumerate()
        .find(|(_, s)| s.id == slot_id)
        .ok_or_else(|| HoleMatchError::SlotNotFound {
            slot_id: slot_id.to_owned(),
        })
}
