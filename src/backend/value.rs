//! Cached Value Module
//!
//! Payload representation shared by all backends, plus the generic binary
//! codec between computed results and stored payloads.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Cached Value ==
/// Payload stored at a cache key.
///
/// `Text` carries a raw string that the secondary store passes through
/// unmodified; `Blob` carries the generic binary serialization of an
/// arbitrary serializable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CachedValue {
    /// Raw text stored as-is
    Text(String),
    /// Binary serialization of an arbitrary value
    Blob(Vec<u8>),
}

impl CachedValue {
    // == Encode ==
    /// Encodes a serializable value into a binary payload.
    pub fn encode<T: Serialize>(value: &T) -> Result<Self> {
        let bytes = bincode::serialize(value)
            .map_err(|e| CacheError::Serialization(format!("Failed to encode value: {}", e)))?;
        Ok(CachedValue::Blob(bytes))
    }

    // == Decode ==
    /// Decodes the payload back into a concrete value shape.
    ///
    /// A `Text` payload decodes into string-shaped targets, so raw text
    /// written directly through a backend stays readable by the wrapper.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            CachedValue::Blob(bytes) => bincode::deserialize(bytes)
                .map_err(|e| CacheError::Serialization(format!("Failed to decode value: {}", e))),
            CachedValue::Text(text) => {
                serde_json::from_value(serde_json::Value::String(text.clone())).map_err(|e| {
                    CacheError::Serialization(format!("Failed to decode text payload: {}", e))
                })
            }
        }
    }
}
