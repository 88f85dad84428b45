// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared setup for coordinator unit tests

use super::Coordinator;
use chrono::DateTime;
use kvipc_adapters::{FakeStore, StoreCall};
use kvipc_core::{FakeClock, IpcConfig, MutexConfig, ResourceType};
use kvipc_storage::MemoryDownMarker;
use std::time::Duration;

pub(super) const START: i64 = 1_700_000_000;

pub(super) type TestCoordinator = Coordinator<FakeStore<FakeClock>, MemoryDownMarker, FakeClock>;

/// Everything a test needs to look behind the coordinator's back
pub(super) struct Harness {
    pub coordinator: TestCoordinator,
    pub store: FakeStore<FakeClock>,
    pub marker: MemoryDownMarker,
    pub clock: FakeClock,
    pub config: IpcConfig,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(config())
    }

    pub fn with_config(config: IpcConfig) -> Self {
        let clock = FakeClock::at(DateTime::from_timestamp(START, 0).unwrap());
        let store = FakeStore::with_clock(clock.clone());
        Self::build(store, MemoryDownMarker::new(), clock, config)
    }

    pub fn build(
        store: FakeStore<FakeClock>,
        marker: MemoryDownMarker,
        clock: FakeClock,
        config: IpcConfig,
    ) -> Self {
        let coordinator =
            Coordinator::new(store.clone(), marker.clone(), clock.clone(), &config).unwrap();
        Self {
            coordinator,
            store,
            marker,
            clock,
            config,
        }
    }

    /// A second process on the same store, marker and clock
    pub fn peer(&self) -> TestCoordinator {
        Coordinator::new(
            self.store.handle(),
            self.marker.clone(),
            self.clock.clone(),
            &self.config,
        )
        .unwrap()
    }

    /// Calls that reached the store, local configuration excluded
    pub fn round_trips(&self) -> Vec<StoreCall> {
        self.store
            .calls()
            .into_iter()
            .filter(StoreCall::is_round_trip)
            .collect()
    }

    pub fn set_if_absent_count(&self) -> usize {
        self.store
            .calls()
            .iter()
            .filter(|c| matches!(c, StoreCall::SetIfAbsent { .. }))
            .count()
    }
}

/// 1000ms timeout polled every 50ms: 21 wait cycles
pub(super) fn config() -> IpcConfig {
    let mut config = IpcConfig::default();
    config.store.key_prefix = "t:".to_string();
    config.mutex = MutexConfig::new(Duration::from_millis(1000), Duration::from_millis(50));
    config.down.expiration = Duration::from_secs(60);
    config
}

pub(super) fn resource(name: &str) -> ResourceType {
    ResourceType::new(name).unwrap()
}
