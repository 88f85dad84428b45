// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory down-marker for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::marker::{DownMarkerStore, MarkerError};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MemoryState {
    value: Option<i64>,
    fail_writes: bool,
    writes: usize,
}

/// Down-marker held in memory; clones share the same value
#[derive(Debug, Clone, Default)]
pub struct MemoryDownMarker {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDownMarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a marker already written
    pub fn with_value(until: i64) -> Self {
        let marker = Self::new();
        marker.lock().value = Some(until);
        marker
    }

    /// Current value, without going through the trait
    pub fn value(&self) -> Option<i64> {
        self.lock().value
    }

    /// Number of successful `store` calls
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    /// Make `store` fail as if the disk were read-only
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DownMarkerStore for MemoryDownMarker {
    fn load(&self) -> Result<Option<i64>, MarkerError> {
        Ok(self.lock().value)
    }

    fn store(&self, until: i64) -> Result<(), MarkerError> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(MarkerError::Io {
                path: PathBuf::from("<memory>"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "writes disabled"),
            });
        }
        state.value = Some(until);
        state.writes += 1;
        Ok(())
    }

    fn clear(&self) -> Result<(), MarkerError> {
        self.lock().value = None;
        Ok(())
    }
}
