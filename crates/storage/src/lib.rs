// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Durable local state: the persisted down-marker

mod marker;

#[cfg(any(test, feature = "test-support"))]
mod memory;

pub use marker::{DownMarkerStore, FileDownMarker, MarkerError};

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryDownMarker;
