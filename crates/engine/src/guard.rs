// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store availability guard
//!
//! Tracks whether the store is inside a down window. While it is, callers get
//! an answer without any network traffic. The first check after the window
//! closes reports [`Availability::Recovered`] exactly once so the owner can
//! dial a fresh connection.

use chrono::{DateTime, Local, Utc};
use kvipc_core::Clock;
use kvipc_storage::{DownMarkerStore, MarkerError};
use std::time::Duration;

/// Outcome of an availability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Store is usable
    Up,
    /// Inside a down window; do not touch the network
    Down { until: DateTime<Utc> },
    /// The down window just elapsed; reconnect before use
    Recovered,
}

impl Availability {
    pub fn is_down(&self) -> bool {
        matches!(self, Availability::Down { .. })
    }
}

/// Per-process circuit breaker over the remote store
pub struct AvailabilityGuard<M, C> {
    marker: M,
    clock: C,
    expiration: Duration,
    down_until: Option<DateTime<Utc>>,
    was_down: bool,
    reconnects: u64,
}

impl<M: DownMarkerStore, C: Clock> AvailabilityGuard<M, C> {
    /// Build a guard, inheriting any down window persisted by another process
    pub fn new(marker: M, clock: C, expiration: Duration) -> Self {
        let down_until = load_persisted(&marker, clock.now());
        Self {
            marker,
            clock,
            expiration,
            down_until,
            was_down: down_until.is_some(),
            reconnects: 0,
        }
    }

    /// Check availability, consuming the one-shot recovery signal
    pub fn check(&mut self) -> Availability {
        let now = self.clock.now();
        if let Some(until) = self.down_until {
            if now < until {
                self.was_down = true;
                return Availability::Down { until };
            }
        }

        if self.was_down {
            self.was_down = false;
            self.down_until = None;
            self.reconnects += 1;
            self.discard_stale_marker(now);
            return Availability::Recovered;
        }
        Availability::Up
    }

    /// Whether `now` falls inside the down window, without side effects
    pub fn is_down(&self) -> bool {
        self.down_until.is_some_and(|until| self.clock.now() < until)
    }

    /// Open a down window of the configured length and persist it
    ///
    /// Persisting is best-effort: on failure only the in-memory window is set.
    pub fn mark_down(&mut self) -> DateTime<Utc> {
        let now = self.clock.now();
        let until = chrono::Duration::from_std(self.expiration)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.down_until = Some(until);
        self.was_down = true;

        match self.marker.store(until.timestamp()) {
            Ok(()) => tracing::warn!(until = %format_until(until), "store marked down"),
            Err(e) => tracing::warn!(
                until = %format_until(until),
                error = %e,
                "store marked down, but the down-marker could not be written"
            ),
        }
        until
    }

    /// End of the current or last down window
    pub fn down_until(&self) -> Option<DateTime<Utc>> {
        self.down_until
    }

    /// Number of recoveries signalled so far
    pub fn reconnect_count(&self) -> u64 {
        self.reconnects
    }

    fn discard_stale_marker(&self, now: DateTime<Utc>) {
        if let Ok(Some(secs)) = self.marker.load() {
            if secs <= now.timestamp() {
                clear_marker(&self.marker);
            }
        }
    }
}

/// Human-readable local time used in down-window logs
pub fn format_until(until: DateTime<Utc>) -> String {
    until
        .with_timezone(&Local)
        .format("%d.%m.%Y %H:%M:%S")
        .to_string()
}

fn load_persisted<M: DownMarkerStore>(marker: &M, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match marker.load() {
        Ok(None) => None,
        Ok(Some(secs)) => match DateTime::from_timestamp(secs, 0) {
            Some(until) if until > now => {
                tracing::warn!(
                    until = %format_until(until),
                    "store is marked down by an earlier process"
                );
                Some(until)
            }
            _ => {
                tracing::debug!(until = secs, "discarding expired down-marker");
                clear_marker(marker);
                None
            }
        },
        Err(e @ MarkerError::Corrupt { .. }) => {
            tracing::warn!(error = %e, "discarding unreadable down-marker");
            clear_marker(marker);
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "cannot read down-marker, assuming store is up");
            None
        }
    }
}

fn clear_marker<M: DownMarkerStore>(marker: &M) {
    if let Err(e) = marker.clear() {
        tracing::warn!(error = %e, "failed to remove down-marker");
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
