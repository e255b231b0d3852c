//! Key Encoder Module
//!
//! The pluggable seam between collected call arguments and the tree that
//! gets fingerprinted.

use serde_json::Value;

use crate::error::Result;
use crate::key::CallKey;

// == Key Encoder ==
/// Strategy for encoding a call's arguments into the value tree that is
/// hashed into a cache key.
///
/// The default encoder uses the canonical order-normalized tuple; a custom
/// encoder can widen or narrow what participates in the key (e.g. ignore an
/// argument that does not affect the result).
pub trait KeyEncoder: Send + Sync {
    /// Encodes the call's arguments into the tree to be fingerprinted.
    fn encode(&self, key: &CallKey) -> Result<Value>;
}

// == Default Encoder ==
/// Default encoder: the canonical order-normalized tuple.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultKeyEncoder;

impl KeyEncoder for DefaultKeyEncoder {
    fn encode(&self, key: &CallKey) -> Result<Value> {
        Ok(key.canonical())
    }
}
