// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::commands::fixtures::{coordinator, down_coordinator, resource};
use kvipc_core::SlotId;

#[test]
fn clean_by_type_leaves_other_types() {
    let (mut coordinator, store) = coordinator();
    coordinator.set_data(&resource("a"), SlotId::DEFAULT, &1);
    coordinator.set_data(&resource("b"), SlotId::DEFAULT, &1);

    let outcome = clean(
        &mut coordinator,
        CleanArgs {
            resource: Some(resource("a")),
        },
    );

    assert_eq!(outcome, Outcome::Success);
    assert_eq!(store.keys(0), vec!["kvipc:b:2".to_string()]);
}

#[test]
fn clean_everything() {
    let (mut coordinator, store) = coordinator();
    coordinator.set_data(&resource("a"), SlotId::DEFAULT, &1);
    coordinator.set_data(&resource("b"), SlotId::DEFAULT, &1);

    assert_eq!(
        clean(&mut coordinator, CleanArgs { resource: None }),
        Outcome::Success
    );
    assert!(store.keys(0).is_empty());
}

#[test]
fn reinit_requires_confirmation() {
    let (mut coordinator, store) = coordinator();
    coordinator.set_data(&resource("a"), SlotId::DEFAULT, &1);

    assert!(reinit(&mut coordinator, ReinitArgs { yes: false }).is_err());
    assert_eq!(store.keys(0).len(), 1);

    let outcome = reinit(&mut coordinator, ReinitArgs { yes: true }).unwrap();
    assert_eq!(outcome, Outcome::Success);
    assert!(store.keys(0).is_empty());
}

#[test]
fn admin_commands_while_down_are_unavailable() {
    let mut coordinator = down_coordinator();

    assert_eq!(
        clean(&mut coordinator, CleanArgs { resource: None }),
        Outcome::Unavailable
    );
    assert_eq!(
        reinit(&mut coordinator, ReinitArgs { yes: true }).unwrap(),
        Outcome::Unavailable
    );
}
