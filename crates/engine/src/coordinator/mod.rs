// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-process mutexes and data slots over a remote store

mod hold;
mod mutex;
mod slots;

pub use hold::MutexHold;

use crate::guard::{Availability, AvailabilityGuard};
use kvipc_adapters::{RedisStore, StoreClient, StoreError, TracedStore};
use kvipc_core::{Clock, ConfigError, IpcConfig, MutexConfig, StoreConfig, SystemClock};
use kvipc_storage::{DownMarkerStore, FileDownMarker};

/// Coordinator wired to a real Redis server and the on-disk down-marker
pub type RedisCoordinator = Coordinator<TracedStore<RedisStore>, FileDownMarker, SystemClock>;

/// Build a [`RedisCoordinator`] from configuration
pub fn open(config: &IpcConfig) -> Result<RedisCoordinator, ConfigError> {
    Coordinator::new(
        TracedStore::new(RedisStore::new()),
        FileDownMarker::new(&config.down.marker_path),
        SystemClock,
        config,
    )
}

/// One process's handle on the shared coordination layer
///
/// Every operation consults the availability guard first. While the store is
/// marked down, operations return `false`/`None` without a round trip.
/// Store failures never surface as errors: callers check the returned value.
pub struct Coordinator<S, M, C> {
    store: S,
    guard: AvailabilityGuard<M, C>,
    clock: C,
    mutex: MutexConfig,
    settings: StoreConfig,
}

impl<S: StoreClient, M: DownMarkerStore, C: Clock> Coordinator<S, M, C> {
    /// Validate configuration and connect, unless the store is known down
    ///
    /// A failed connection is not an error here: it marks the store down and
    /// the coordinator retries once the down window has passed.
    pub fn new(store: S, marker: M, clock: C, config: &IpcConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let guard = AvailabilityGuard::new(marker, clock.clone(), config.down.expiration);
        let mut coordinator = Self {
            store,
            guard,
            clock,
            mutex: config.mutex.clone(),
            settings: config.store.clone(),
        };

        if coordinator.guard.is_down() {
            tracing::info!("skipping connect while the store is marked down");
        } else if let Err(e) = coordinator.connect() {
            tracing::error!(error = %e, "cannot reach the store");
            coordinator.guard.mark_down();
        }

        Ok(coordinator)
    }

    /// Whether the store may be used right now
    ///
    /// The first call after a down window reconnects before answering.
    pub fn is_active(&mut self) -> bool {
        match self.guard.check() {
            Availability::Up => true,
            Availability::Down { .. } => false,
            Availability::Recovered => {
                tracing::info!("down window elapsed, reconnecting to the store");
                match self.connect() {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::error!(error = %e, "reconnect failed");
                        self.guard.mark_down();
                        false
                    }
                }
            }
        }
    }

    pub fn guard(&self) -> &AvailabilityGuard<M, C> {
        &self.guard
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mutex_config(&self) -> &MutexConfig {
        &self.mutex
    }

    fn connect(&mut self) -> Result<(), StoreError> {
        self.store.connect(&self.settings.endpoint())?;
        if let Some(password) = &self.settings.password {
            self.store.authenticate(password)?;
        }
        self.store.select_namespace(self.settings.namespace)?;
        self.store.configure(&self.settings.client_options())
    }
}

#[cfg(test)]
mod fixtures;
