// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake store client for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{StoreClient, StoreError};
use crate::codec::{decode, encode};
use chrono::{DateTime, Utc};
use kvipc_core::{ClientOptions, Clock, Endpoint, Serializer, SystemClock};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Connect { host: String, port: u16 },
    Authenticate,
    SelectNamespace(u32),
    Configure { serializer: Serializer, key_prefix: String },
    Get { key: String },
    SetIfAbsent { key: String, ttl: Duration },
    Set { key: String, ttl: Option<Duration> },
    Delete { keys: Vec<String> },
    Exists { key: String },
    ScanPrefix { prefix: String },
    FlushNamespace,
}

impl StoreCall {
    /// Whether the call talks to the store, as opposed to local setup
    pub fn is_round_trip(&self) -> bool {
        !matches!(self, StoreCall::Configure { .. })
    }
}

#[derive(Debug, Clone)]
struct FakeEntry {
    bytes: Vec<u8>,
    expires_at: Option<DateTime<Utc>>,
}

/// Keyspace and call log shared by every handle
#[derive(Default)]
struct FakeState {
    namespaces: HashMap<u32, BTreeMap<String, FakeEntry>>,
    calls: Vec<StoreCall>,
    password: Option<String>,
    unreachable: bool,
}

/// In-memory store for testing
///
/// Clones share one keyspace but each keeps its own connection, so several
/// clones behave like separate processes talking to the same server.
#[derive(Clone)]
pub struct FakeStore<C: Clock = SystemClock> {
    state: Arc<Mutex<FakeState>>,
    clock: C,
    connected: bool,
    namespace: u32,
    options: ClientOptions,
}

impl FakeStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for FakeStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FakeStore<C> {
    /// Create a store whose TTLs follow `clock`
    pub fn with_clock(clock: C) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            clock,
            connected: false,
            namespace: 0,
            options: ClientOptions {
                serializer: Serializer::Json,
                key_prefix: String::new(),
            },
        }
    }

    /// A new, disconnected client on the same keyspace
    pub fn handle(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: self.clock.clone(),
            connected: false,
            namespace: 0,
            options: ClientOptions {
                serializer: Serializer::Json,
                key_prefix: String::new(),
            },
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Clear recorded calls
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Number of recorded connection attempts
    pub fn connect_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, StoreCall::Connect { .. }))
            .count()
    }

    /// Make every call fail as if the server were gone
    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    /// Require this password on authenticate
    pub fn set_password(&self, password: impl Into<String>) {
        self.lock().password = Some(password.into());
    }

    /// Full keys currently alive in a namespace, prefix included
    pub fn keys(&self, namespace: u32) -> Vec<String> {
        let now = self.clock.now();
        self.lock()
            .namespaces
            .get(&namespace)
            .map(|ns| {
                ns.iter()
                    .filter(|(_, e)| is_live(e, now))
                    .map(|(k, _)| k.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Remaining TTL of a full key, if it has one
    pub fn ttl(&self, namespace: u32, full_key: &str) -> Option<Duration> {
        let now = self.clock.now();
        let state = self.lock();
        let expires_at = state.namespaces.get(&namespace)?.get(full_key)?.expires_at?;
        (expires_at - now).to_std().ok()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.options.key_prefix, key)
    }

    fn expiry(&self, ttl: Option<Duration>) -> Option<DateTime<Utc>> {
        let ttl = chrono::Duration::from_std(ttl?).ok()?;
        self.clock.now().checked_add_signed(ttl)
    }

    /// Record a call and check that it may reach the keyspace
    fn begin(&self, call: StoreCall) -> Result<std::sync::MutexGuard<'_, FakeState>, StoreError> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.unreachable {
            return Err(StoreError::Connection("store unreachable".to_string()));
        }
        if !self.connected {
            return Err(StoreError::NotConnected);
        }
        Ok(state)
    }
}

fn is_live(entry: &FakeEntry, now: DateTime<Utc>) -> bool {
    entry.expires_at.map_or(true, |at| at > now)
}

/// Live entries of one namespace, dropping expired ones
fn live_namespace(
    state: &mut FakeState,
    namespace: u32,
    now: DateTime<Utc>,
) -> &mut BTreeMap<String, FakeEntry> {
    let ns = state.namespaces.entry(namespace).or_default();
    ns.retain(|_, e| is_live(e, now));
    ns
}

impl<C: Clock> StoreClient for FakeStore<C> {
    fn connect(&mut self, endpoint: &Endpoint) -> Result<(), StoreError> {
        self.connected = false;
        let mut state = self.lock();
        state.calls.push(StoreCall::Connect {
            host: endpoint.host.clone(),
            port: endpoint.port,
        });
        if state.unreachable {
            return Err(StoreError::Connection(format!(
                "connection refused: {}:{}",
                endpoint.host, endpoint.port
            )));
        }
        drop(state);
        self.connected = true;
        self.namespace = 0;
        Ok(())
    }

    fn authenticate(&mut self, secret: &str) -> Result<(), StoreError> {
        let state = self.begin(StoreCall::Authenticate)?;
        match &state.password {
            Some(expected) if expected != secret => {
                Err(StoreError::Auth("invalid password".to_string()))
            }
            _ => Ok(()),
        }
    }

    fn select_namespace(&mut self, namespace: u32) -> Result<(), StoreError> {
        drop(self.begin(StoreCall::SelectNamespace(namespace))?);
        self.namespace = namespace;
        Ok(())
    }

    fn configure(&mut self, options: &ClientOptions) -> Result<(), StoreError> {
        self.lock().calls.push(StoreCall::Configure {
            serializer: options.serializer,
            key_prefix: options.key_prefix.clone(),
        });
        self.options = options.clone();
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<Value>, StoreError> {
        let full = self.full_key(key);
        let now = self.clock.now();
        let serializer = self.options.serializer;
        let mut state = self.begin(StoreCall::Get {
            key: key.to_string(),
        })?;
        let ns = live_namespace(&mut state, self.namespace, now);
        Ok(ns
            .get(&full)
            .map(|e| decode(serializer, &e.bytes))
            .transpose()?)
    }

    fn set_if_absent(
        &mut self,
        key: &str,
        value: &Value,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let full = self.full_key(key);
        let now = self.clock.now();
        let expires_at = self.expiry(Some(ttl));
        let bytes = encode(self.options.serializer, value)?;
        let mut state = self.begin(StoreCall::SetIfAbsent {
            key: key.to_string(),
            ttl,
        })?;
        let ns = live_namespace(&mut state, self.namespace, now);
        if ns.contains_key(&full) {
            return Ok(false);
        }
        ns.insert(full, FakeEntry { bytes, expires_at });
        Ok(true)
    }

    fn set(&mut self, key: &str, value: &Value, ttl: Option<Duration>) -> Result<bool, StoreError> {
        let full = self.full_key(key);
        let now = self.clock.now();
        let expires_at = self.expiry(ttl);
        let bytes = encode(self.options.serializer, value)?;
        let mut state = self.begin(StoreCall::Set {
            key: key.to_string(),
            ttl,
        })?;
        live_namespace(&mut state, self.namespace, now).insert(full, FakeEntry { bytes, expires_at });
        Ok(true)
    }

    fn delete(&mut self, keys: &[String]) -> Result<u64, StoreError> {
        let full: Vec<String> = keys.iter().map(|k| self.full_key(k)).collect();
        let now = self.clock.now();
        let mut state = self.begin(StoreCall::Delete {
            keys: keys.to_vec(),
        })?;
        let ns = live_namespace(&mut state, self.namespace, now);
        Ok(full.iter().filter(|k| ns.remove(*k).is_some()).count() as u64)
    }

    fn exists(&mut self, key: &str) -> Result<u64, StoreError> {
        let full = self.full_key(key);
        let now = self.clock.now();
        let mut state = self.begin(StoreCall::Exists {
            key: key.to_string(),
        })?;
        Ok(u64::from(
            live_namespace(&mut state, self.namespace, now).contains_key(&full),
        ))
    }

    fn scan_prefix(&mut self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let full_prefix = self.full_key(prefix);
        let key_prefix = self.options.key_prefix.clone();
        let now = self.clock.now();
        let mut state = self.begin(StoreCall::ScanPrefix {
            prefix: prefix.to_string(),
        })?;
        Ok(live_namespace(&mut state, self.namespace, now)
            .keys()
            .filter(|k| k.starts_with(&full_prefix))
            .filter_map(|k| k.strip_prefix(key_prefix.as_str()).map(str::to_owned))
            .collect())
    }

    fn flush_namespace(&mut self) -> Result<bool, StoreError> {
        let mut state = self.begin(StoreCall::FlushNamespace)?;
        state.namespaces.remove(&self.namespace);
        Ok(true)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
