//! Memocache - A transparent memoization layer
//!
//! Wraps pure or idempotent functions with a cache lookup over pluggable
//! storage backends (in-memory, Redis, Memcached), so repeated calls with
//! equal arguments are served from a shared store instead of recomputing.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//!
//! use memocache::{memoize, MemoryBackend};
//!
//! let backend = Arc::new(MemoryBackend::new());
//! let factorial = memoize(backend, |(n,): (u64,)| (1..=n).product::<u64>());
//!
//! assert_eq!(factorial.call((10,)).unwrap(), 3_628_800); // computed
//! assert_eq!(factorial.call((10,)).unwrap(), 3_628_800); // served from cache
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod key;
pub mod memo;

pub use backend::{Backend, CachedValue, MemcachedBackend, MemoryBackend, RedisBackend};
pub use config::{MemcachedConfig, RedisConfig};
pub use error::{CacheError, Result};
pub use key::{fingerprint, CacheArgs, CallKey, DefaultKeyEncoder, KeyEncoder, FINGERPRINT_LENGTH};
pub use memo::{memoize, CacheStats, MemoBuilder, Memoized};
