// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kvipc status` - Report whether the store is usable

use super::Outcome;
use crate::output::{self, OutputFormat};
use chrono::{DateTime, Utc};
use clap::Args;
use kvipc_adapters::StoreClient;
use kvipc_core::Clock;
use kvipc_engine::{format_until, Coordinator};
use kvipc_storage::DownMarkerStore;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct StatusArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_until: Option<DateTime<Utc>>,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.active, self.down_until) {
            (true, _) => write!(f, "active"),
            (false, Some(until)) => write!(f, "down until {}", format_until(until)),
            (false, None) => write!(f, "down"),
        }
    }
}

pub fn report<S: StoreClient, M: DownMarkerStore, C: Clock>(
    coordinator: &mut Coordinator<S, M, C>,
) -> StatusReport {
    let active = coordinator.is_active();
    StatusReport {
        active,
        down_until: if active {
            None
        } else {
            coordinator.guard().down_until()
        },
    }
}

pub fn status<S: StoreClient, M: DownMarkerStore, C: Clock>(
    coordinator: &mut Coordinator<S, M, C>,
    args: StatusArgs,
) -> Outcome {
    let report = report(coordinator);
    output::print(&report, args.format);
    Outcome::from_bool(report.active, Outcome::Unavailable)
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
