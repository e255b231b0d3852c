//! Memo Module
//!
//! The memoizing wrapper: higher-order composition of key encoding,
//! fingerprinting and backend storage around a target function.

mod stats;
mod wrapper;

// Re-export public types
pub use stats::CacheStats;
pub use wrapper::{memoize, MemoBuilder, Memoized};
