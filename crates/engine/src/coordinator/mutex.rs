// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mutex acquisition by polling a conditional set

use super::{Coordinator, MutexHold};
use kvipc_adapters::StoreClient;
use kvipc_core::{Clock, ResourceType};
use kvipc_storage::DownMarkerStore;
use serde_json::Value;
use std::time::Duration;

/// Waits longer than this are reported once the mutex is acquired
const SLOW_WAIT: Duration = Duration::from_millis(50);

impl<S: StoreClient, M: DownMarkerStore, C: Clock> Coordinator<S, M, C> {
    /// Block until the mutex for `resource` is held by this process
    ///
    /// Returns `false` without waiting while the store is down. A wait that
    /// outlasts the mutex TTL is taken as a sign the store is unresponsive:
    /// the store is marked down and `false` is returned. Never proceed into
    /// the critical section on `false`.
    pub fn block_mutex(&mut self, resource: &ResourceType) -> bool {
        if !self.is_active() {
            tracing::debug!(%resource, "store is down, not waiting for mutex");
            return false;
        }

        let key = resource.mutex_key();
        let max_cycles = self.mutex.max_wait_cycles();
        let log_cycles = self.mutex.log_wait_cycles();
        let mut attempts: u64 = 0;

        loop {
            match self
                .store
                .set_if_absent(&key, &Value::Bool(true), self.mutex.timeout)
            {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => tracing::debug!(%resource, error = %e, "mutex attempt failed"),
            }

            attempts += 1;
            if attempts % log_cycles == 0 {
                tracing::debug!(%resource, attempts, max_cycles, "waiting for mutex");
            }
            if attempts > max_cycles {
                tracing::error!(
                    %resource,
                    attempts,
                    waited_ms = self.waited(attempts).as_millis() as u64,
                    "gave up waiting for mutex, marking store down"
                );
                self.guard.mark_down();
                return false;
            }
            self.clock.sleep(self.mutex.block_wait);
        }

        let waited = self.waited(attempts);
        if waited > SLOW_WAIT {
            tracing::warn!(
                %resource,
                waited_ms = waited.as_millis() as u64,
                "slow mutex acquisition"
            );
        }
        true
    }

    /// Delete the mutex key for `resource`
    ///
    /// Not gated by the availability guard, so a holder can always release.
    /// Returns whether a key was actually removed.
    pub fn release_mutex(&mut self, resource: &ResourceType) -> bool {
        match self.store.delete(&[resource.mutex_key()]) {
            Ok(removed) => removed > 0,
            Err(e) => {
                tracing::warn!(%resource, error = %e, "mutex release failed");
                false
            }
        }
    }

    /// Acquire the mutex as a guard that releases it when dropped
    pub fn lock(&mut self, resource: &ResourceType) -> Option<MutexHold<'_, S, M, C>> {
        if self.block_mutex(resource) {
            Some(MutexHold::new(self, resource.clone()))
        } else {
            None
        }
    }

    /// Run `f` while holding the mutex for `resource`
    ///
    /// Returns `None`, without calling `f`, when the mutex was not acquired.
    /// The mutex is released on every exit path, including a panic in `f`.
    pub fn with_mutex<R>(
        &mut self,
        resource: &ResourceType,
        f: impl FnOnce(&mut Self) -> R,
    ) -> Option<R> {
        let mut hold = self.lock(resource)?;
        Some(f(&mut hold))
    }

    fn waited(&self, attempts: u64) -> Duration {
        self.mutex
            .block_wait
            .saturating_mul(u32::try_from(attempts).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
#[path = "mutex_tests.rs"]
mod tests;
