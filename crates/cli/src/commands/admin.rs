// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kvipc clean` / `kvipc reinit` - Administrative wipes

use super::Outcome;
use anyhow::{bail, Result};
use clap::Args;
use kvipc_adapters::StoreClient;
use kvipc_core::{Clock, ResourceType};
use kvipc_engine::Coordinator;
use kvipc_storage::DownMarkerStore;

#[derive(Args)]
pub struct CleanArgs {
    /// Only clear this resource type; all types under the key prefix otherwise
    #[arg(long = "type")]
    pub resource: Option<ResourceType>,
}

#[derive(Args)]
pub struct ReinitArgs {
    /// Confirm flushing the entire store namespace
    #[arg(long)]
    pub yes: bool,
}

pub fn clean<S: StoreClient, M: DownMarkerStore, C: Clock>(
    coordinator: &mut Coordinator<S, M, C>,
    args: CleanArgs,
) -> Outcome {
    let cleaned = match &args.resource {
        Some(resource) => coordinator.clean_resource(resource),
        None => coordinator.clean(),
    };
    Outcome::from_bool(cleaned, Outcome::Unavailable)
}

pub fn reinit<S: StoreClient, M: DownMarkerStore, C: Clock>(
    coordinator: &mut Coordinator<S, M, C>,
    args: ReinitArgs,
) -> Result<Outcome> {
    if !args.yes {
        bail!("reinit flushes the whole store namespace; pass --yes to confirm");
    }
    Ok(Outcome::from_bool(
        coordinator.reinit_ipc(),
        Outcome::Unavailable,
    ))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
