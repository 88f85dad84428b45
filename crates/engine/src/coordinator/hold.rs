// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::Coordinator;
use kvipc_adapters::StoreClient;
use kvipc_core::{Clock, ResourceType};
use kvipc_storage::DownMarkerStore;
use std::ops::{Deref, DerefMut};

/// A held mutex; dropping it releases the mutex key
///
/// Derefs to the coordinator so data slots can be used while holding.
pub struct MutexHold<'a, S: StoreClient, M: DownMarkerStore, C: Clock> {
    coordinator: &'a mut Coordinator<S, M, C>,
    resource: ResourceType,
    released: bool,
}

impl<'a, S: StoreClient, M: DownMarkerStore, C: Clock> MutexHold<'a, S, M, C> {
    pub(super) fn new(coordinator: &'a mut Coordinator<S, M, C>, resource: ResourceType) -> Self {
        Self {
            coordinator,
            resource,
            released: false,
        }
    }

    pub fn resource(&self) -> &ResourceType {
        &self.resource
    }

    /// Release now and report whether the key was removed
    pub fn release(mut self) -> bool {
        self.released = true;
        self.coordinator.release_mutex(&self.resource)
    }

    /// Give up the hold without deleting the key, leaving it to its TTL
    ///
    /// Once the TTL may have run out the key can belong to another process,
    /// and the delete in [`release`](Self::release) does not check ownership.
    pub fn abandon(mut self) {
        self.released = true;
        tracing::warn!(resource = %self.resource, "mutex abandoned to its TTL");
    }
}

impl<S: StoreClient, M: DownMarkerStore, C: Clock> Deref for MutexHold<'_, S, M, C> {
    type Target = Coordinator<S, M, C>;

    fn deref(&self) -> &Self::Target {
        self.coordinator
    }
}

impl<S: StoreClient, M: DownMarkerStore, C: Clock> DerefMut for MutexHold<'_, S, M, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.coordinator
    }
}

impl<S: StoreClient, M: DownMarkerStore, C: Clock> Drop for MutexHold<'_, S, M, C> {
    fn drop(&mut self) {
        if !self.released && !self.coordinator.release_mutex(&self.resource) {
            tracing::warn!(resource = %self.resource, "mutex was already gone on release");
        }
    }
}
