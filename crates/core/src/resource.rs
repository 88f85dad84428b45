// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource types and the store keys derived from them
//!
//! Every resource type owns one mutex key (`<type>MX`) and a family of data
//! keys (`<type>:<id>`). Ids 0 and 1 are reserved and cannot be constructed.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Longest accepted resource type name, in bytes
pub const MAX_RESOURCE_TYPE_LEN: usize = 128;

/// Suffix appended to a resource type to form its mutex key
pub const MUTEX_KEY_SUFFIX: &str = "MX";

/// Separator between a resource type and a slot id in data keys
pub const DATA_KEY_SEPARATOR: char = ':';

/// Errors from building keys out of caller input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("resource type must not be empty")]
    EmptyType,
    #[error("resource type {0:?} contains a reserved character")]
    InvalidType(String),
    #[error("resource type is {0} bytes long (max {max})", max = MAX_RESOURCE_TYPE_LEN)]
    TypeTooLong(usize),
    #[error("slot id {0} is reserved (ids start at {min})", min = SlotId::MIN)]
    ReservedSlot(u32),
}

/// Name of the logical subsystem that owns a mutex and a data namespace
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceType(String);

impl ResourceType {
    pub fn new(name: impl Into<String>) -> Result<Self, KeyError> {
        let name = name.into();
        if name.is_empty() {
            return Err(KeyError::EmptyType);
        }
        if name.len() > MAX_RESOURCE_TYPE_LEN {
            return Err(KeyError::TypeTooLong(name.len()));
        }
        if name
            .chars()
            .any(|c| c == DATA_KEY_SEPARATOR || c == '*' || c.is_whitespace() || c.is_control())
        {
            return Err(KeyError::InvalidType(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key whose presence means the mutex is held
    pub fn mutex_key(&self) -> String {
        format!("{}{}", self.0, MUTEX_KEY_SUFFIX)
    }

    /// Key holding the data slot `id`
    pub fn data_key(&self, id: SlotId) -> String {
        format!("{}{}{}", self.0, DATA_KEY_SEPARATOR, id.0)
    }

    /// Prefix shared by every data key of this type
    pub fn data_pattern(&self) -> String {
        format!("{}{}", self.0, DATA_KEY_SEPARATOR)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ResourceType {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ResourceType {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceType> for String {
    fn from(value: ResourceType) -> Self {
        value.0
    }
}

/// Identifier of a data slot within a resource type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SlotId(u32);

impl SlotId {
    /// Smallest id available to callers
    pub const MIN: u32 = 2;

    /// Slot used when the caller does not name one
    pub const DEFAULT: SlotId = SlotId(Self::MIN);

    pub fn new(id: u32) -> Result<Self, KeyError> {
        if id < Self::MIN {
            return Err(KeyError::ReservedSlot(id));
        }
        Ok(Self(id))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for SlotId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for SlotId {
    type Error = KeyError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SlotId> for u32 {
    fn from(value: SlotId) -> Self {
        value.0
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
