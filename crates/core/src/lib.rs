// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kvipc-core: shared vocabulary for the kvipc coordination layer
//!
//! This crate provides:
//! - Resource types and the mutex/data keys derived from them
//! - A clock abstraction with a controllable fake for tests
//! - TOML configuration for the store, mutex timing and down-marker

pub mod clock;
pub mod config;
pub mod resource;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    ClientOptions, ConfigError, DownConfig, Endpoint, IpcConfig, LoggingConfig, MutexConfig,
    Serializer, StoreConfig,
};
pub use resource::{KeyError, ResourceType, SlotId};
