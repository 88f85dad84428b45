// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data slots: small shared values keyed by resource type and slot id

use super::Coordinator;
use kvipc_adapters::StoreClient;
use kvipc_core::{Clock, ResourceType, SlotId};
use kvipc_storage::DownMarkerStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

impl<S: StoreClient, M: DownMarkerStore, C: Clock> Coordinator<S, M, C> {
    pub fn has_data(&mut self, resource: &ResourceType, id: SlotId) -> bool {
        if !self.is_active() {
            return false;
        }
        let key = resource.data_key(id);
        match self.store.exists(&key) {
            Ok(count) => count >= 1,
            Err(e) => {
                tracing::warn!(key, error = %e, "slot check failed");
                false
            }
        }
    }

    /// Read a slot; absence and failures both yield `None`
    pub fn get_data(&mut self, resource: &ResourceType, id: SlotId) -> Option<Value> {
        if !self.is_active() {
            return None;
        }
        let key = resource.data_key(id);
        match self.store.get(&key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "slot read failed");
                None
            }
        }
    }

    /// Read a slot into a typed value; a value of another shape yields `None`
    pub fn get_data_as<T: DeserializeOwned>(
        &mut self,
        resource: &ResourceType,
        id: SlotId,
    ) -> Option<T> {
        let value = self.get_data(resource, id)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                tracing::warn!(key = resource.data_key(id), error = %e, "slot holds an unexpected value");
                None
            }
        }
    }

    /// Overwrite a slot, with no TTL
    ///
    /// Not atomic with respect to earlier reads: hold the resource's mutex
    /// around read-modify-write sequences.
    pub fn set_data<T: Serialize + ?Sized>(
        &mut self,
        resource: &ResourceType,
        id: SlotId,
        value: &T,
    ) -> bool {
        if !self.is_active() {
            return false;
        }
        let key = resource.data_key(id);
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, error = %e, "slot value cannot be serialized");
                return false;
            }
        };
        match self.store.set(&key, &value, None) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(key, error = %e, "slot write failed");
                false
            }
        }
    }

    /// Wipe the whole store namespace, other users' keys included
    pub fn reinit_ipc(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        match self.store.flush_namespace() {
            Ok(flushed) => {
                tracing::warn!(namespace = self.settings.namespace, "store namespace flushed");
                flushed
            }
            Err(e) => {
                tracing::error!(error = %e, "namespace flush failed");
                false
            }
        }
    }

    /// Delete every key under the configured key prefix
    ///
    /// This clears mutexes and slots of all resource types sharing the prefix.
    /// Use [`Coordinator::clean_resource`] to clear a single type.
    pub fn clean(&mut self) -> bool {
        self.delete_matching("", None)
    }

    /// Delete one resource type's slots and its mutex key
    pub fn clean_resource(&mut self, resource: &ResourceType) -> bool {
        self.delete_matching(&resource.data_pattern(), Some(resource.mutex_key()))
    }

    fn delete_matching(&mut self, prefix: &str, extra: Option<String>) -> bool {
        if !self.is_active() {
            return false;
        }
        let mut keys = match self.store.scan_prefix(prefix) {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(prefix, error = %e, "key scan failed");
                return false;
            }
        };
        keys.extend(extra);

        match self.store.delete(&keys) {
            Ok(removed) => {
                tracing::info!(prefix, removed, "cleaned keys");
                true
            }
            Err(e) => {
                tracing::warn!(prefix, error = %e, "key delete failed");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "slots_tests.rs"]
mod tests;
