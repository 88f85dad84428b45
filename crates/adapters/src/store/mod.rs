// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key/value store clients

mod redis;

pub use self::redis::RedisStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, StoreCall};

use crate::codec::CodecError;
use kvipc_core::{ClientOptions, Endpoint};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not connected to the store")]
    NotConnected,
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Blocking client for a remote key/value store
///
/// Keys passed to data operations are relative; the client prepends the key
/// prefix set through [`StoreClient::configure`]. Values are encoded with the
/// configured serializer.
pub trait StoreClient: Send {
    /// Open a fresh connection, dropping any previous one
    fn connect(&mut self, endpoint: &Endpoint) -> Result<(), StoreError>;

    fn authenticate(&mut self, secret: &str) -> Result<(), StoreError>;

    /// Switch to a numbered keyspace
    fn select_namespace(&mut self, namespace: u32) -> Result<(), StoreError>;

    /// Apply serializer and key prefix
    fn configure(&mut self, options: &ClientOptions) -> Result<(), StoreError>;

    fn get(&mut self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Atomically create `key` with a TTL, only if it does not exist yet
    ///
    /// Returns `false` when the key was already present.
    fn set_if_absent(&mut self, key: &str, value: &Value, ttl: Duration)
        -> Result<bool, StoreError>;

    /// Unconditional write, optionally expiring
    fn set(&mut self, key: &str, value: &Value, ttl: Option<Duration>) -> Result<bool, StoreError>;

    /// Delete keys, returning how many existed
    fn delete(&mut self, keys: &[String]) -> Result<u64, StoreError>;

    fn exists(&mut self, key: &str) -> Result<u64, StoreError>;

    /// List keys starting with `prefix`, relative to the key prefix
    fn scan_prefix(&mut self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Remove every key in the selected namespace
    fn flush_namespace(&mut self) -> Result<bool, StoreError>;
}
