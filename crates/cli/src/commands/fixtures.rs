// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::DateTime;
use kvipc_adapters::FakeStore;
use kvipc_core::{FakeClock, IpcConfig, MutexConfig, ResourceType};
use kvipc_engine::Coordinator;
use kvipc_storage::MemoryDownMarker;
use std::time::Duration;

pub(crate) const START: i64 = 1_700_000_000;

pub(crate) type FakeCoordinator = Coordinator<FakeStore<FakeClock>, MemoryDownMarker, FakeClock>;

pub(crate) fn coordinator() -> (FakeCoordinator, FakeStore<FakeClock>) {
    coordinator_with_marker(MemoryDownMarker::new())
}

pub(crate) fn coordinator_with_marker(
    marker: MemoryDownMarker,
) -> (FakeCoordinator, FakeStore<FakeClock>) {
    build(marker, &IpcConfig::default())
}

pub(crate) fn coordinator_with_config(config: &IpcConfig) -> (FakeCoordinator, FakeStore<FakeClock>) {
    build(MemoryDownMarker::new(), config)
}

fn build(marker: MemoryDownMarker, config: &IpcConfig) -> (FakeCoordinator, FakeStore<FakeClock>) {
    let clock = FakeClock::at(DateTime::from_timestamp(START, 0).unwrap());
    let store = FakeStore::with_clock(clock.clone());
    let coordinator = Coordinator::new(store.clone(), marker, clock, config).unwrap();
    (coordinator, store)
}

/// Config whose mutex key lives `timeout_ms`, polled every 10ms
pub(crate) fn mutex_config(timeout_ms: u64) -> IpcConfig {
    let mut config = IpcConfig::default();
    config.mutex = MutexConfig::new(
        Duration::from_millis(timeout_ms),
        Duration::from_millis(10),
    );
    config
}

/// Coordinator whose store is marked down for the next minute
pub(crate) fn down_coordinator() -> FakeCoordinator {
    coordinator_with_marker(MemoryDownMarker::with_value(START + 60)).0
}

pub(crate) fn resource(name: &str) -> ResourceType {
    ResourceType::new(name).unwrap()
}
