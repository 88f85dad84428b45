// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrapper for consistent observability

use crate::store::{StoreClient, StoreError};
use kvipc_core::{ClientOptions, Endpoint};
use serde_json::Value;
use std::time::{Duration, Instant};

/// Wrapper that adds tracing to any StoreClient
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

impl<S: StoreClient> StoreClient for TracedStore<S> {
    fn connect(&mut self, endpoint: &Endpoint) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.connect", host = %endpoint.host, port = endpoint.port);
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.inner.connect(endpoint);

        match &result {
            Ok(()) => tracing::info!(elapsed_ms = elapsed_ms(start), "connected"),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed_ms(start),
                error = %e,
                "connect failed"
            ),
        }

        result
    }

    fn authenticate(&mut self, secret: &str) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.auth");
        let _guard = span.enter();

        let result = self.inner.authenticate(secret);
        if let Err(e) = &result {
            tracing::error!(error = %e, "authentication failed");
        }
        result
    }

    fn select_namespace(&mut self, namespace: u32) -> Result<(), StoreError> {
        let result = self.inner.select_namespace(namespace);
        match &result {
            Ok(()) => tracing::debug!(namespace, "namespace selected"),
            Err(e) => tracing::error!(namespace, error = %e, "select failed"),
        }
        result
    }

    fn configure(&mut self, options: &ClientOptions) -> Result<(), StoreError> {
        tracing::debug!(
            serializer = ?options.serializer,
            key_prefix = %options.key_prefix,
            "configured"
        );
        self.inner.configure(options)
    }

    fn get(&mut self, key: &str) -> Result<Option<Value>, StoreError> {
        let result = self.inner.get(key);
        match &result {
            Ok(value) => tracing::trace!(key, found = value.is_some(), "get"),
            Err(e) => tracing::warn!(key, error = %e, "get failed"),
        }
        result
    }

    fn set_if_absent(
        &mut self,
        key: &str,
        value: &Value,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let result = self.inner.set_if_absent(key, value, ttl);
        match &result {
            Ok(created) => tracing::trace!(key, ttl_ms = ttl.as_millis() as u64, created, "set nx"),
            Err(e) => tracing::warn!(key, error = %e, "set nx failed"),
        }
        result
    }

    fn set(&mut self, key: &str, value: &Value, ttl: Option<Duration>) -> Result<bool, StoreError> {
        let result = self.inner.set(key, value, ttl);
        match &result {
            Ok(_) => tracing::trace!(key, "set"),
            Err(e) => tracing::warn!(key, error = %e, "set failed"),
        }
        result
    }

    fn delete(&mut self, keys: &[String]) -> Result<u64, StoreError> {
        let result = self.inner.delete(keys);
        match &result {
            Ok(removed) => tracing::debug!(requested = keys.len(), removed, "deleted"),
            Err(e) => tracing::warn!(requested = keys.len(), error = %e, "delete failed"),
        }
        result
    }

    fn exists(&mut self, key: &str) -> Result<u64, StoreError> {
        let result = self.inner.exists(key);
        if let Err(e) = &result {
            tracing::warn!(key, error = %e, "exists failed");
        }
        result
    }

    fn scan_prefix(&mut self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let span = tracing::info_span!("store.scan", prefix);
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.inner.scan_prefix(prefix);
        match &result {
            Ok(keys) => tracing::debug!(
                found = keys.len(),
                elapsed_ms = elapsed_ms(start),
                "scanned"
            ),
            Err(e) => tracing::warn!(error = %e, "scan failed"),
        }
        result
    }

    fn flush_namespace(&mut self) -> Result<bool, StoreError> {
        let span = tracing::info_span!("store.flush");
        let _guard = span.enter();

        let result = self.inner.flush_namespace();
        match &result {
            Ok(_) => tracing::warn!("namespace flushed"),
            Err(e) => tracing::error!(error = %e, "flush failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
