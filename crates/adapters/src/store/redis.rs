// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redis store client

use super::{StoreClient, StoreError};
use crate::codec::{decode, encode};
use ::redis::{Client, Connection, ConnectionAddr, ConnectionInfo, RedisConnectionInfo, RedisError};
use kvipc_core::{ClientOptions, Endpoint, Serializer};
use serde_json::Value;
use std::time::Duration;

/// Keys fetched per SCAN round trip
const SCAN_BATCH: usize = 500;

/// Store client backed by a blocking Redis connection
pub struct RedisStore {
    conn: Option<Connection>,
    options: ClientOptions,
}

impl Default for RedisStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RedisStore {
    pub fn new() -> Self {
        Self {
            conn: None,
            options: ClientOptions {
                serializer: Serializer::Json,
                key_prefix: String::new(),
            },
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.options.key_prefix, key)
    }

    fn conn(&mut self) -> Result<&mut Connection, StoreError> {
        self.conn.as_mut().ok_or(StoreError::NotConnected)
    }
}

impl StoreClient for RedisStore {
    fn connect(&mut self, endpoint: &Endpoint) -> Result<(), StoreError> {
        self.conn = None;

        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(endpoint.host.clone(), endpoint.port),
            redis: RedisConnectionInfo::default(),
        };
        let client = Client::open(info).map_err(|e| StoreError::Connection(e.to_string()))?;
        let conn = client
            .get_connection_with_timeout(endpoint.timeout)
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        conn.set_read_timeout(Some(endpoint.timeout))
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        conn.set_write_timeout(Some(endpoint.timeout))
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        self.conn = Some(conn);
        Ok(())
    }

    fn authenticate(&mut self, secret: &str) -> Result<(), StoreError> {
        ::redis::cmd("AUTH")
            .arg(secret)
            .query::<()>(self.conn()?)
            .map_err(|e| StoreError::Auth(e.to_string()))
    }

    fn select_namespace(&mut self, namespace: u32) -> Result<(), StoreError> {
        ::redis::cmd("SELECT")
            .arg(namespace)
            .query::<()>(self.conn()?)
            .map_err(command_error)
    }

    fn configure(&mut self, options: &ClientOptions) -> Result<(), StoreError> {
        self.options = options.clone();
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<Value>, StoreError> {
        let key = self.key(key);
        let serializer = self.options.serializer;
        let raw: Option<Vec<u8>> = ::redis::cmd("GET")
            .arg(&key)
            .query(self.conn()?)
            .map_err(command_error)?;
        Ok(raw.map(|bytes| decode(serializer, &bytes)).transpose()?)
    }

    fn set_if_absent(
        &mut self,
        key: &str,
        value: &Value,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let key = self.key(key);
        let bytes = encode(self.options.serializer, value)?;
        // SET NX PX is a single atomic command
        let reply: Option<String> = ::redis::cmd("SET")
            .arg(&key)
            .arg(bytes)
            .arg("NX")
            .arg("PX")
            .arg(ttl_millis(ttl))
            .query(self.conn()?)
            .map_err(command_error)?;
        Ok(reply.is_some())
    }

    fn set(&mut self, key: &str, value: &Value, ttl: Option<Duration>) -> Result<bool, StoreError> {
        let key = self.key(key);
        let bytes = encode(self.options.serializer, value)?;
        let mut cmd = ::redis::cmd("SET");
        cmd.arg(&key).arg(bytes);
        if let Some(ttl) = ttl {
            cmd.arg("PX").arg(ttl_millis(ttl));
        }
        let reply: Option<String> = cmd.query(self.conn()?).map_err(command_error)?;
        Ok(reply.is_some())
    }

    fn delete(&mut self, keys: &[String]) -> Result<u64, StoreError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let keys: Vec<String> = keys.iter().map(|k| self.key(k)).collect();
        ::redis::cmd("DEL")
            .arg(&keys)
            .query(self.conn()?)
            .map_err(command_error)
    }

    fn exists(&mut self, key: &str) -> Result<u64, StoreError> {
        let key = self.key(key);
        ::redis::cmd("EXISTS")
            .arg(&key)
            .query(self.conn()?)
            .map_err(command_error)
    }

    fn scan_prefix(&mut self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let full_prefix = self.key(prefix);
        let pattern = format!("{}*", escape_glob(&full_prefix));
        let key_prefix = self.options.key_prefix.clone();
        let conn = self.conn()?;

        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = ::redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query(conn)
                .map_err(command_error)?;
            keys.extend(
                batch
                    .into_iter()
                    .filter_map(|k| k.strip_prefix(key_prefix.as_str()).map(str::to_owned)),
            );
            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may return a key more than once
        keys.sort();
        keys.dedup();
        Ok(keys)
    }

    fn flush_namespace(&mut self) -> Result<bool, StoreError> {
        ::redis::cmd("FLUSHDB")
            .query::<()>(self.conn()?)
            .map_err(command_error)?;
        Ok(true)
    }
}

fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

fn command_error(e: RedisError) -> StoreError {
    if e.is_io_error() || e.is_timeout() || e.is_connection_dropped() || e.is_connection_refusal()
    {
        StoreError::Connection(e.to_string())
    } else {
        StoreError::Command(e.to_string())
    }
}

/// Escape glob metacharacters so a literal prefix can be used in MATCH
fn escape_glob(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
