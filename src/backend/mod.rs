//! Backend Module
//!
//! Pluggable storage adapters behind a common get/set/delete interface.

mod memcached;
mod memory;
mod redis;
mod value;

// Re-export public types
pub use self::memcached::MemcachedBackend;
pub use self::memory::MemoryBackend;
pub use self::redis::RedisBackend;
pub use self::value::CachedValue;

use crate::error::Result;

// == Public Constants ==
/// Maximum key length in bytes accepted by the memcached protocol
pub const MEMCACHED_MAX_KEY_LENGTH: usize = 250;

// == Backend Trait ==
/// Storage adapter interface.
///
/// Every storage engine implements get/set/delete over opaque payloads; the
/// memoizing wrapper is generic over this trait, so new variants (such as an
/// in-memory map for testing) plug in without touching the wrapper.
///
/// Remote variants validate their connection is live before each operation
/// and fail fast with a backend error rather than silently reporting a miss
/// when the store is unreachable.
pub trait Backend: Send + Sync {
    /// Returns the payload stored at `key`, or None if no entry exists.
    ///
    /// Absence is explicit: a stored payload is always `Some`, so a cached
    /// empty or zero value is never mistaken for a miss.
    fn get(&self, key: &str) -> Result<Option<CachedValue>>;

    /// Stores `value` at `key`, overwriting any existing entry.
    ///
    /// Returns whether the store acknowledged the write.
    fn set(&self, key: &str, value: CachedValue) -> Result<bool>;

    /// Removes the entry at `key`.
    ///
    /// Returns true if a deletion occurred, false if the key was absent.
    fn delete(&self, key: &str) -> Result<bool>;
}
