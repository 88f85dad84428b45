// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kvipc exec` / `kvipc release` - Run under a mutex, or force one free

use super::{unavailable, Outcome};
use anyhow::{Context, Result};
use clap::Args;
use kvipc_adapters::StoreClient;
use kvipc_core::{Clock, ResourceType};
use kvipc_engine::Coordinator;
use kvipc_storage::DownMarkerStore;
use std::io;
use std::process::{Child, Command, ExitStatus};
use std::time::{Duration, Instant};

#[derive(Args)]
pub struct ExecArgs {
    /// Resource type whose mutex to hold
    pub resource: ResourceType,

    /// Command to run while holding the mutex
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

#[derive(Args)]
pub struct ReleaseArgs {
    /// Resource type whose mutex to delete
    pub resource: ResourceType,
}

/// Hold the mutex for the lifetime of a child process
///
/// The mutex key only lives for `mutex.timeout`, so a child still running
/// shortly before the key expires is killed and the key is left to expire
/// rather than deleted.
pub fn exec<S: StoreClient, M: DownMarkerStore, C: Clock>(
    coordinator: &mut Coordinator<S, M, C>,
    args: ExecArgs,
) -> Result<Outcome> {
    let (program, rest) = args
        .command
        .split_first()
        .context("no command given")?;
    let poll = coordinator.mutex_config().block_wait;
    // Stop one poll ahead of expiry so the kill lands while the key is ours
    let limit = coordinator.mutex_config().timeout.saturating_sub(poll);

    let Some(hold) = coordinator.lock(&args.resource) else {
        eprintln!("mutex for {} not acquired", args.resource);
        return Ok(Outcome::Unavailable);
    };
    let start = Instant::now();

    let mut child = match Command::new(program).args(rest).spawn() {
        Ok(child) => child,
        Err(e) => {
            drop(hold);
            return Err(e).with_context(|| format!("failed to run {program}"));
        }
    };

    match wait_within(&mut child, start, limit, poll) {
        Ok(Some(status)) => {
            drop(hold);
            // Killed by a signal: no code to hand through
            let code = status.code().unwrap_or(1);
            Ok(Outcome::Code(u8::try_from(code).unwrap_or(1)))
        }
        Ok(None) => {
            tracing::error!(
                resource = %args.resource,
                limit_ms = limit.as_millis() as u64,
                "command outlived the mutex timeout, killed"
            );
            hold.abandon();
            eprintln!(
                "{program} killed: still running when the mutex for {} was about to expire",
                args.resource
            );
            Ok(Outcome::Unavailable)
        }
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            drop(hold);
            Err(e).with_context(|| format!("failed to wait for {program}"))
        }
    }
}

/// Wait for `child` until `limit` after `start`, killing it past that
///
/// Returns `None` when the child had to be killed.
fn wait_within(
    child: &mut Child,
    start: Instant,
    limit: Duration,
    poll: Duration,
) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let elapsed = start.elapsed();
        if elapsed >= limit {
            child.kill()?;
            child.wait()?;
            return Ok(None);
        }
        std::thread::sleep(poll.min(limit - elapsed));
    }
}

pub fn release<S: StoreClient, M: DownMarkerStore, C: Clock>(
    coordinator: &mut Coordinator<S, M, C>,
    args: ReleaseArgs,
) -> Outcome {
    if let Some(outcome) = unavailable(coordinator) {
        return outcome;
    }
    Outcome::from_bool(
        coordinator.release_mutex(&args.resource),
        Outcome::Absent,
    )
}

#[cfg(test)]
#[path = "mutex_tests.rs"]
mod tests;
