//! Error types for the memoization layer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the memoization layer.
///
/// Backend variants carry plain message payloads so callers can match on the
/// storage engine involved without depending on the underlying client
/// library's error types.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Wrapper built without a usable backend
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Redis liveness probe or operation failure
    #[error("Redis backend error: {0}")]
    RedisBackend(String),

    /// Memcached liveness probe or operation failure
    #[error("Memcached backend error: {0}")]
    MemcachedBackend(String),

    /// Call arguments could not be encoded into a canonical key
    #[error("Key encoding failed: {0}")]
    KeyEncoding(String),

    /// Stored payload could not be encoded or decoded
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Result Type Alias ==
/// Convenience Result type for the memoization layer.
pub type Result<T> = std::result::Result<T, CacheError>;
