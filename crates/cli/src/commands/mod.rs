// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod admin;
pub mod mutex;
pub mod slot;
pub mod status;

use kvipc_adapters::StoreClient;
use kvipc_core::{Clock, SlotId};
use kvipc_engine::Coordinator;
use kvipc_storage::DownMarkerStore;
use std::process::ExitCode;

/// Invalid arguments or configuration
pub const EXIT_MISUSE: u8 = 2;

/// How a command finished, mapped onto the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 0
    Success,
    /// 1: nothing there (no value, mutex not held)
    Absent,
    /// 3: store down or the mutex could not be acquired
    Unavailable,
    /// Exit code handed through from a child process
    Code(u8),
}

impl Outcome {
    pub fn from_bool(ok: bool, otherwise: Outcome) -> Self {
        if ok {
            Outcome::Success
        } else {
            otherwise
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::Absent => 1,
            Outcome::Unavailable => 3,
            Outcome::Code(code) => code,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

/// `Some(Unavailable)` when the store cannot be used right now
///
/// Lets lookups tell an outage apart from a missing value or mutex.
pub fn unavailable<S: StoreClient, M: DownMarkerStore, C: Clock>(
    coordinator: &mut Coordinator<S, M, C>,
) -> Option<Outcome> {
    if coordinator.is_active() {
        return None;
    }
    eprintln!("store is unavailable");
    Some(Outcome::Unavailable)
}

pub fn parse_slot(s: &str) -> Result<SlotId, String> {
    let id: u32 = s
        .parse()
        .map_err(|e| format!("invalid slot id `{s}`: {e}"))?;
    SlotId::new(id).map_err(|e| e.to_string())
}

#[cfg(test)]
mod fixtures;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
