use holematch::{
    instantiate, Action, AssignmentController, Dimensions, Hole, HoleMatchError, Photo,
    PhotoTransform, Session, SlotRef, TemplateDefinition, TemplateGroup, TemplateMeta,
    TemplateRegistry, Transform, TransformEngine,
};

fn definition(id: &str, holes: usize) -> TemplateDefinition {
    let holes = (0..holes as u32)
        .map(|i| Hole::new("", i * 200, 0, 150, 100))
        .collect();
    TemplateDefinition::build(
        TemplateMeta {
            id: id.to_owned(),
            print_size: "4x6".to_owned(),
            name: None,
        },
        Dimensions::new(1000, 200),
        holes,
        20,
    )
}

fn photo(id: &str) -> Photo {
    Photo {
        id: id.to_owned(),
        source: format!("drive://{id}"),
        display_name: format!("{id}.jpg"),
        width: 600,
        height: 400,
    }
}

fn registry() -> TemplateRegistry {
    let mut registry = TemplateRegistry::new();
    registry.insert("three.png", 10, definition("three", 3));
    registry.insert("two.png", 10, definition("two", 2));
    registry.insert("four.png", 10, definition("four", 4));
    registry
}

fn photo_ids(group: &TemplateGroup) -> Vec<Option<&str>> {
    group.slots.iter().map(|s| s.photo_id()).collect()
}

#[test]
fn apply_then_remove_restores_original_slots() {
    let registry = registry();
    let ctl = AssignmentController::new(&registry);
    let slots = instantiate(&definition("three", 3), "g");

    let filled = ctl.apply_photo(&slots, "g:slot_1", &photo("a"), None).unwrap();
    assert_eq!(filled[1].photo_id(), Some("a"));
    assert_eq!(
        filled[1].transform(),
        Some(&ctl.transforms().default_transform())
    );
    assert_eq!(filled[0], slots[0]);
    assert_eq!(filled[2], slots[2]);
    // The input collection is untouched.
    assert!(slots[1].is_empty());

    let cleared = ctl.remove_photo(&filled, "g:slot_1").unwrap();
    assert_eq!(cleared, slots);
}

#[test]
fn apply_keeps_existing_transform_when_none_given() {
    let registry = registry();
    let ctl = AssignmentController::new(&registry);
    let slots = instantiate(&definition("three", 3), "g");
    let zoomed = Transform::Photo(PhotoTransform {
        scale: 2.0,
        center_x: 0.4,
        center_y: 0.5,
    });

    let first = ctl
        .apply_photo(&slots, "g:slot_0", &photo("a"), Some(zoomed))
        .unwrap();
    assert_eq!(first[0].transform(), Some(&zoomed));

    let swapped = ctl.apply_photo(&first, "g:slot_0", &photo("b"), None).unwrap();
    assert_eq!(swapped[0].photo_id(), Some("b"));
    assert_eq!(swapped[0].transform(), Some(&zoomed));
}

#[test]
fn unknown_slot_is_a_typed_error() {
    let registry = registry();
    let ctl = AssignmentController::new(&registry);
    let slots = instantiate(&definition("three", 3), "g");
    let missing = HoleMatchError::SlotNotFound {
        slot_id: "g:slot_9".to_owned(),
    };

    assert_eq!(ctl.select_slot(&slots, "g:slot_9").unwrap_err(), missing);
    assert_eq!(
        ctl.apply_photo(&slots, "g:slot_9", &photo("a"), None)
            .unwrap_err(),
        missing
    );
    assert_eq!(ctl.remove_photo(&slots, "g:slot_9").unwrap_err(), missing);
    assert_eq!(ctl.auto_advance(&slots, "g:slot_9").unwrap_err(), missing);
}

#[test]
fn remove_on_empty_slot_is_a_no_op() {
    let registry = registry();
    let ctl = AssignmentController::new(&registry);
    let slots = instantiate(&definition("three", 3), "g");
    assert_eq!(ctl.remove_photo(&slots, "g:slot_2").unwrap(), slots);
}

#[test]
fn auto_advance_moves_to_first_empty_then_clears() {
    let registry = registry();
    let ctl = AssignmentController::new(&registry);
    let mut slots = instantiate(&definition("two", 2), "g");
    let mut other = instantiate(&definition("two", 2), "h");

    slots = ctl.apply_photo(&slots, "g:slot_1", &photo("a"), None).unwrap();
    let mut all = slots.clone();
    all.append(&mut other);
    let advance = ctl.auto_advance(&all, "g:slot_1").unwrap();
    assert!(!advance.group_complete);
    assert_eq!(
        advance.next,
        Some(SlotRef {
            group_id: "g".to_owned(),
            slot_id: "g:slot_0".to_owned(),
        })
    );

    slots = ctl.apply_photo(&slots, "g:slot_0", &photo("b"), None).unwrap();
    let advance = ctl.auto_advance(&slots, "g:slot_0").unwrap();
    assert!(advance.group_complete);
    assert!(advance.next.is_none());
    assert!(advance.selection().is_none());
}

fn session_with_three_slots(ctl: &AssignmentController<'_>) -> Session {
    let mut session = ctl
        .reduce(
            &Session::new(),
            Action::AddGroup {
                template_id: "three".to_owned(),
                group_id: "print-1".to_owned(),
            },
        )
        .unwrap();
    for (slot, id) in [("print-1:slot_0", "a"), ("print-1:slot_1", "b")] {
        session = ctl
            .reduce(
                &session,
                Action::ApplyPhoto {
                    slot_id: slot.to_owned(),
                    photo: photo(id),
                    transform: None,
                },
            )
            .unwrap();
    }
    session
}

#[test]
fn replacement_truncates_without_reassigning() {
    let registry = registry();
    let ctl = AssignmentController::new(&registry);
    let session = session_with_three_slots(&ctl);
    assert_eq!(photo_ids(&session.groups[0]), vec![Some("a"), Some("b"), None]);

    let smaller = ctl
        .replace_template_at_position(&session, 0, &definition("two", 2))
        .unwrap();
    assert_eq!(photo_ids(&smaller.groups[0]), vec![Some("a"), Some("b")]);
    assert_eq!(smaller.groups[0].template.id, "two");

    let larger = ctl
        .replace_template_at_position(&session, 0, &definition("four", 4))
        .unwrap();
    assert_eq!(
        photo_ids(&larger.groups[0]),
        vec![Some("a"), Some("b"), None, None]
    );
    assert_eq!(larger.groups[0].slots[3].id, "print-1:slot_3");
}

#[test]
fn replacement_is_idempotent() {
    let registry = registry();
    let ctl = AssignmentController::new(&registry);
    let session = session_with_three_slots(&ctl);
    let def = definition("two", 2);

    let once = ctl.replace_template_at_position(&session, 0, &def).unwrap();
    let again = ctl.replace_template_at_position(&session, 0, &def).unwrap();
    assert_eq!(once, again);
    let twice = ctl.replace_template_at_position(&once, 0, &def).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn replacement_out_of_range_is_typed_error() {
    let registry = registry();
    let ctl = AssignmentController::new(&registry);
    let session = session_with_three_slots(&ctl);
    let err = ctl
        .replace_template_at_position(&session, 3, &definition("two", 2))
        .unwrap_err();
    assert_eq!(err, HoleMatchError::GroupIndexOutOfRange { index: 3, len: 1 });
}

#[test]
fn replacement_clears_selection_on_dropped_slot() {
    let registry = registry();
    let ctl = AssignmentController::new(&registry);
    let session = session_with_three_slots(&ctl);
    // Two of three filled: selection advanced to the remaining empty slot.
    assert_eq!(
        session.selection.as_ref().map(|s| s.slot_id.as_str()),
        Some("print-1:slot_2")
    );

    let smaller = ctl
        .reduce(
            &session,
            Action::ReplaceTemplate {
                group_index: 0,
                template_id: "two".to_owned(),
            },
        )
        .unwrap();
    assert!(smaller.selection.is_none());
}

#[test]
fn reducer_clean_view_policy_after_last_photo() {
    let registry = registry();
    let ctl = AssignmentController::new(&registry);
    let session = session_with_three_slots(&ctl);
    let done = ctl
        .reduce(
            &session,
            Action::ApplyPhoto {
                slot_id: "print-1:slot_2".to_owned(),
                photo: photo("c"),
                transform: None,
            },
        )
        .unwrap();
    assert!(done.groups[0].is_complete());
    assert!(done.selection.is_none());

    let ordered: Vec<&str> = done.ordered_slots().filter_map(|s| s.photo_id()).collect();
    assert_eq!(ordered, vec!["a", "b", "c"]);
}

#[test]
fn reducer_group_lifecycle() {
    let registry = registry();
    let ctl = AssignmentController::new(&registry);
    let err = ctl
        .reduce(
            &Session::new(),
            Action::AddGroup {
                template_id: "missing".to_owned(),
                group_id: "x".to_owned(),
            },
        )
        .unwrap_err();
    assert_eq!(
        err,
        HoleMatchError::TemplateNotFound {
            template_id: "missing".to_owned(),
        }
    );

    let session = session_with_three_slots(&ctl);
    let selected = ctl
        .reduce(
            &session,
            Action::Select {
                slot_id: "print-1:slot_0".to_owned(),
            },
        )
        .unwrap();
    assert_eq!(
        selected.selection.as_ref().map(|s| s.slot_id.as_str()),
        Some("print-1:slot_0")
    );

    let removed = ctl
        .reduce(&selected, Action::RemoveGroup { group_index: 0 })
        .unwrap();
    assert!(removed.groups.is_empty());
    assert!(removed.selection.is_none());
    assert_eq!(
        ctl.reduce(&removed, Action::RemoveGroup { group_index: 0 })
            .unwrap_err(),
        HoleMatchError::GroupIndexOutOfRange { index: 0, len: 0 }
    );
}

#[test]
fn reducer_remove_photo_keeps_selection() {
    let registry = registry();
    let ctl = AssignmentController::new(&registry);
    let session = session_with_three_slots(&ctl);
    let next = ctl
        .reduce(
            &session,
            Action::RemovePhoto {
                slot_id: "print-1:slot_0".to_owned(),
            },
        )
        .unwrap();
    assert_eq!(photo_ids(&next.groups[0]), vec![None, Some("b"), None]);
    assert_eq!(next.selection, session.selection);
}

#[test]
fn custom_zoom_ceiling_flows_through_apply() {
    let registry = registry();
    let ctl = AssignmentController::new(&registry)
        .with_transforms(TransformEngine::new(2.0).unwrap());
    assert_eq!(ctl.transforms().max_zoom, 2.0);
    let slots = instantiate(&definition("three", 3), "g");
    let wanted = Transform::Photo(PhotoTransform {
        scale: 5.0,
        center_x: 0.5,
        center_y: 0.5,
    });

    let filled = ctl
        .apply_photo(&slots, "g:slot_0", &photo("a"), Some(wanted))
        .unwrap();
    let Some(Transform::Photo(t)) = filled[0].transform() else {
        panic!("expected a photo-space transform");
    };
    assert_eq!(t.scale, 2.0);
}

#[test]
fn duplicate_group_id_is_rejected() {
    let registry = registry();
    let ctl = AssignmentController::new(&registry);
    let session = session_with_three_slots(&ctl);
    let err = ctl
        .reduce(
            &session,
            Action::AddGroup {
                template_id: "two".to_owned(),
                group_id: "print-1".to_owned(),
            },
        )
        .unwrap_err();
    assert_eq!(
        err,
        HoleMatchError::DuplicateGroup {
            group_id: "print-1".to_owned(),
        }
    );

    let second = ctl
        .reduce(
            &session,
            Action::AddGroup {
                template_id: "two".to_owned(),
                group_id: "print-2".to_owned(),
            },
        )
        .unwrap();
    let filled = ctl
        .reduce(
            &second,
            Action::ApplyPhoto {
                slot_id: "print-2:slot_0".to_owned(),
                photo: photo("z"),
                transform: None,
            },
        )
        .unwrap();
    let group = filled.group(1).unwrap();
    assert_eq!(group.id, "print-2");
    assert_eq!(photo_ids(group), vec![Some("z"), None]);
    assert_eq!(
        photo_ids(filled.group(0).unwrap()),
        vec![Some("a"), Some("b"), None]
    );
    assert!(filled.group(2).is_none());
}
