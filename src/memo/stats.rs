//! Cache Statistics Module
//!
//! Tracks memoization metrics including hits, misses, and store failures.

use serde::Serialize;

// == Cache Stats ==
/// Tracks memoization metrics for one wrapped function.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of calls served from the cache
    pub hits: u64,
    /// Number of calls that invoked the wrapped function
    pub misses: u64,
    /// Number of computed results that could not be written back
    pub store_failures: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no calls have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Store Failure ==
    /// Increments the store-failure counter.
    pub fn record_store_failure(&mut self) {
        self.store_failures += 1;
    }
}
