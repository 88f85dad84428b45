// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kvipc has` / `kvipc get` / `kvipc set` - Data slot access

use super::{parse_slot, unavailable, Outcome};
use anyhow::{Context, Result};
use clap::Args;
use kvipc_adapters::StoreClient;
use kvipc_core::{Clock, ResourceType, SlotId};
use kvipc_engine::Coordinator;
use kvipc_storage::DownMarkerStore;
use serde_json::Value;

#[derive(Args)]
pub struct SlotArgs {
    /// Resource type owning the slot
    pub resource: ResourceType,

    /// Slot id (0 and 1 are reserved)
    #[arg(long, default_value = "2", value_parser = parse_slot)]
    pub id: SlotId,
}

#[derive(Args)]
pub struct SetArgs {
    /// Resource type owning the slot
    pub resource: ResourceType,

    /// JSON value to store
    pub value: String,

    /// Slot id (0 and 1 are reserved)
    #[arg(long, default_value = "2", value_parser = parse_slot)]
    pub id: SlotId,
}

pub fn has<S: StoreClient, M: DownMarkerStore, C: Clock>(
    coordinator: &mut Coordinator<S, M, C>,
    args: SlotArgs,
) -> Outcome {
    if let Some(outcome) = unavailable(coordinator) {
        return outcome;
    }
    let present = coordinator.has_data(&args.resource, args.id);
    println!("{present}");
    Outcome::from_bool(present, Outcome::Absent)
}

pub fn get<S: StoreClient, M: DownMarkerStore, C: Clock>(
    coordinator: &mut Coordinator<S, M, C>,
    args: SlotArgs,
) -> Outcome {
    if let Some(outcome) = unavailable(coordinator) {
        return outcome;
    }
    match coordinator.get_data(&args.resource, args.id) {
        Some(value) => {
            println!("{value}");
            Outcome::Success
        }
        None => Outcome::Absent,
    }
}

pub fn set<S: StoreClient, M: DownMarkerStore, C: Clock>(
    coordinator: &mut Coordinator<S, M, C>,
    args: SetArgs,
) -> Result<Outcome> {
    let value: Value = serde_json::from_str(&args.value)
        .with_context(|| format!("value is not valid JSON: {}", args.value))?;
    Ok(Outcome::from_bool(
        coordinator.set_data(&args.resource, args.id, &value),
        Outcome::Unavailable,
    ))
}

#[cfg(test)]
#[path = "slot_tests.rs"]
mod tests;
