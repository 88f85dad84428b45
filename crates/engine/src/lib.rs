// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kvipc coordination engine
//!
//! A [`Coordinator`] gives independent processes a shared mutex per resource
//! type and a handful of data slots, all kept in a remote key/value store.
//! When the store stops answering, the [`AvailabilityGuard`] marks it down for
//! a while so callers fail fast instead of piling up on a dead server.

mod coordinator;
mod guard;

pub use coordinator::{open, Coordinator, MutexHold, RedisCoordinator};
pub use guard::{format_until, Availability, AvailabilityGuard};
