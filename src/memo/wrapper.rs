//! Memoizing Wrapper Module
//!
//! Wraps a target function with the cache lookup protocol: canonicalize the
//! arguments, fingerprint them, query the backend, and populate on a miss.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::backend::{Backend, CachedValue};
use crate::error::{CacheError, Result};
use crate::key::{fingerprint, CacheArgs, DefaultKeyEncoder, KeyEncoder};
use crate::memo::CacheStats;

// == Builder ==
/// Configures and produces memoized wrappers around target functions.
///
/// A backend is required; everything else has defaults. The same backend
/// handle may be shared across many wrapped functions.
pub struct MemoBuilder {
    backend: Option<Arc<dyn Backend>>,
    encoder: Box<dyn KeyEncoder>,
    namespace: Option<String>,
}

impl MemoBuilder {
    // == Constructor ==
    /// Creates a builder with the default key encoder and no backend.
    pub fn new() -> Self {
        Self {
            backend: None,
            encoder: Box::new(DefaultKeyEncoder),
            namespace: None,
        }
    }

    // == Backend ==
    /// Sets the storage backend used by the wrapped function.
    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    // == Key Encoder ==
    /// Replaces the default key encoder.
    pub fn key_encoder(mut self, encoder: impl KeyEncoder + 'static) -> Self {
        self.encoder = Box::new(encoder);
        self
    }

    // == Namespace ==
    /// Folds an identifier into every fingerprint, separating this
    /// function's entries from other functions sharing the backend.
    ///
    /// Without a namespace, two functions called with equal arguments share
    /// a cache entry.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    // == Wrap ==
    /// Produces the memoized wrapper around `func`.
    ///
    /// Fails with a configuration error when no backend was provided.
    pub fn wrap<F, A, R>(self, func: F) -> Result<Memoized<F, A, R>>
    where
        F: Fn(A) -> R,
        A: CacheArgs,
        R: Serialize + DeserializeOwned,
    {
        let backend = self.backend.ok_or_else(|| {
            CacheError::Configuration("No backend provided for memoized function".to_string())
        })?;

        Ok(Memoized {
            func,
            backend,
            encoder: self.encoder,
            namespace: self.namespace,
            stats: Mutex::new(CacheStats::new()),
            _marker: PhantomData,
        })
    }
}

impl Default for MemoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// == Memoized ==
/// A function wrapped with the cache lookup protocol.
///
/// Calls are synchronous pass-throughs: the caller blocks for the backend
/// round trip and, on a miss, for the wrapped function itself. Concurrent
/// callers racing on the same miss both compute; the later store wins.
pub struct Memoized<F, A, R> {
    func: F,
    backend: Arc<dyn Backend>,
    encoder: Box<dyn KeyEncoder>,
    namespace: Option<String>,
    stats: Mutex<CacheStats>,
    _marker: PhantomData<fn(A) -> R>,
}

impl<F, A, R> Memoized<F, A, R>
where
    F: Fn(A) -> R,
    A: CacheArgs,
    R: Serialize + DeserializeOwned,
{
    // == Call ==
    /// Invokes the wrapped function through the cache.
    ///
    /// A hit returns the stored result without running the function. On a
    /// miss the function runs and its result is written back fire-and-forget:
    /// a store failure is logged and counted, never surfaced. A connectivity
    /// failure on the lookup itself propagates to the caller rather than
    /// being treated as a miss.
    pub fn call(&self, args: A) -> Result<R> {
        let key = self.cache_key(&args)?;

        match self.backend.get(&key)? {
            Some(stored) => {
                debug!("Cache hit for {}", key);
                self.record(|stats| stats.record_hit());
                stored.decode()
            }
            None => {
                debug!("Cache miss for {}", key);
                self.record(|stats| stats.record_miss());

                let result = (self.func)(args);
                self.store(&key, &result);
                Ok(result)
            }
        }
    }

    // == Invalidate ==
    /// Removes the cached entry for an argument pack.
    ///
    /// Returns true if an entry was deleted.
    pub fn invalidate(&self, args: &A) -> Result<bool> {
        let key = self.cache_key(args)?;
        self.backend.delete(&key)
    }

    // == Stats ==
    /// Returns a snapshot of this wrapper's metrics.
    pub fn stats(&self) -> CacheStats {
        self.stats
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    // == Key Derivation ==
    /// Computes the fingerprint for an argument pack, folding in the
    /// namespace when one is set.
    fn cache_key(&self, args: &A) -> Result<String> {
        let call_key = args.call_key()?;
        let canonical = self.encoder.encode(&call_key)?;
        let keyed: Value = match &self.namespace {
            Some(namespace) => json!([namespace, canonical]),
            None => canonical,
        };
        fingerprint(&keyed)
    }

    // == Write-Back ==
    /// Fire-and-forget store of a freshly computed result.
    fn store(&self, key: &str, result: &R) {
        let outcome =
            CachedValue::encode(result).and_then(|payload| self.backend.set(key, payload));
        if let Err(e) = outcome {
            warn!("Failed to store result for {}: {}", key, e);
            self.record(|stats| stats.record_store_failure());
        }
    }

    fn record(&self, update: impl FnOnce(&mut CacheStats)) {
        if let Ok(mut stats) = self.stats.lock() {
            update(&mut stats);
        }
    }
}

// == Convenience Constructor ==
/// Wraps `func` over `backend` with the default key encoder and no
/// namespace.
pub fn memoize<F, A, R>(backend: Arc<dyn Backend>, func: F) -> Memoized<F, A, R>
where
    F: Fn(A) -> R,
    A: CacheArgs,
    R: Serialize + DeserializeOwned,
{
    Memoized {
        func,
        backend,
        encoder: Box::new(DefaultKeyEncoder),
        namespace: None,
        stats: Mutex::new(CacheStats::new()),
        _marker: PhantomData,
    }
}
