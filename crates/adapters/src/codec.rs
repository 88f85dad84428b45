// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Value encoding between callers and the store

use kvipc_core::Serializer;
use serde_json::Value;
use thiserror::Error;

/// Errors from encoding or decoding a stored value
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{0} values cannot be stored with the raw serializer")]
    Unsupported(&'static str),
    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode a value for storage
pub fn encode(serializer: Serializer, value: &Value) -> Result<Vec<u8>, CodecError> {
    match serializer {
        Serializer::Json => Ok(serde_json::to_vec(value)?),
        Serializer::Raw => match value {
            Value::Null => Ok(Vec::new()),
            Value::Bool(true) => Ok(b"1".to_vec()),
            Value::Bool(false) => Ok(Vec::new()),
            Value::Number(n) => Ok(n.to_string().into_bytes()),
            Value::String(s) => Ok(s.as_bytes().to_vec()),
            Value::Array(_) => Err(CodecError::Unsupported("array")),
            Value::Object(_) => Err(CodecError::Unsupported("object")),
        },
    }
}

/// Decode a stored value
pub fn decode(serializer: Serializer, bytes: &[u8]) -> Result<Value, CodecError> {
    match serializer {
        Serializer::Json => Ok(serde_json::from_slice(bytes)?),
        Serializer::Raw => Ok(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
