//! Session state and its `(state, action) -> state` transitions.

use super::{AssignmentController, SlotRef};
use crate::slot::{Photo, TemplateGroup, TemplateSlot, Transform};
use crate::util::{HoleMatchError, HoleMatchResult};

/// Ordered template groups of one working session plus the current selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub groups: Vec<TemplateGroup>,
    pub selection: Option<SlotRef>,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// All slots in group order, then slot order.
    pub fn ordered_slots(&self) -> impl Iterator<Item = &TemplateSlot> + '_ {
        self.groups.iter().flat_map(|g| g.slots.iter())
    }

    /// Returns the group at an ordinal position.
    pub fn group(&self, group_index: usize) -> Option<&TemplateGroup> {
        self.groups.get(group_index)
    }

    fn group_index_of_slot(&self, slot_id: &str) -> HoleMatchResult<usize> {
        self.groups
            .iter()
            .position(|g| g.slots.iter().any(|s| s.id == slot_id))
            .ok_or_else(|| HoleMatchError::SlotNotFound {
                slot_id: slot_id.to_owned(),
            })
    }

    fn with_group_slots(&self, group_index: usize, slots: Vec<TemplateSlot>) -> Self {
        let mut next = self.clone();
        next.groups[group_index].slots = slots;
        next
    }
}

/// A single user-driven change to a session.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Appends a group for a registered template; the group id must be new.
    AddGroup { template_id: String, group_id: String },
    /// Removes the group at an ordinal position, with all its slots.
    RemoveGroup { group_index: usize },
    /// Selects a slot.
    Select { slot_id: String },
    /// Clears the selection.
    ClearSelection,
    /// Binds a photo, then advances the selection.
    ApplyPhoto {
        slot_id: String,
        photo: Photo,
        transform: Option<Transform>,
    },
    /// Unbinds the photo of a slot.
    RemovePhoto { slot_id: String },
    /// Swaps the template of a group, keeping photos by slot position.
    ReplaceTemplate {
        group_index: usize,
        template_id: String,
    },
}

pub(super) fn reduce(
    ctl: &AssignmentController<'_>,
    session: &Session,
    action: Action,
) -> HoleMatchResult<Session> {
    match action {
        Action::AddGroup {
            template_id,
            group_id,
        } => {
            if session.groups.iter().any(|g| g.id == group_id) {
                return Err(HoleMatchError::DuplicateGroup { group_id });
            }
            let template = ctl.template(&template_id)?;
            let mut next = session.clone();
            next.groups.push(TemplateGroup::new(group_id, template.clone()));
            Ok(next)
        }
        Action::RemoveGroup { group_index } => {
            if group_index >= session.groups.len() {
                return Err(HoleMatchError::GroupIndexOutOfRange {
                    index: group_index,
                    len: session.groups.len(),
                });
            }
            let mut next = session.clone();
            let removed = next.groups.remove(group_index);
            if next
                .selection
                .as_ref()
                .is_some_and(|sel| sel.group_id == removed.id)
            {
                next.selection = None;
            }
            Ok(next)
        }
        Action::Select { slot_id } => {
            let group_index = session.group_index_of_slot(&slot_id)?;
            let selection = ctl.select_slot(&session.groups[group_index].slots, &slot_id)?;
            let mut next = session.clone();
            next.selection = Some(selection);
            Ok(next)
        }
        Action::ClearSelection => {
            let mut next = session.clone();
            next.selection = None;
            Ok(next)
        }
        Action::ApplyPhoto {
            slot_id,
            photo,
            transform,
        } => {
            let group_index = session.group_index_of_slot(&slot_id)?;
            let slots =
                ctl.apply_photo(&session.groups[group_index].slots, &slot_id, &photo, transform)?;
            let advance = ctl.auto_advance(&slots, &slot_id)?;
            let mut next = session.with_group_slots(group_index, slots);
            next.selection = advance.selection();
            Ok(next)
        }
        Action::RemovePhoto { slot_id } => {
            let group_index = session.group_index_of_slot(&slot_id)?;
            let slots = ctl.remove_photo(&session.groups[group_index].slots, &slot_id)?;
            Ok(session.with_group_slots(group_index, slots))
        }
        Action::ReplaceTemplate {
            group_index,
            template_id,
        } => {
            let template = ctl.template(&template_id)?;
            ctl.replace_template_at_position(session, group_index, template)
        }
    }
}
