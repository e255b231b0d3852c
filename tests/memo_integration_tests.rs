//! Integration Tests for the Memoization Layer
//!
//! Exercises the full wrap → call → store cycle against the in-process
//! backend, plus behavioral-parity suites for the remote backends. The
//! remote suites are ignored by default because they need reachable
//! servers; run them with `cargo test -- --ignored`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use memocache::{
    memoize, Backend, CachedValue, CallKey, MemcachedBackend, MemcachedConfig, MemoryBackend,
    RedisBackend, RedisConfig, FINGERPRINT_LENGTH,
};

// == Helper Functions ==

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "memocache=debug".into()),
        )
        .try_init();
}

fn factorial(n: u64) -> u64 {
    (1..=n).product()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Report {
    title: String,
    totals: Vec<u64>,
}

/// Runs the same get/set/delete sequence every backend must agree on, for an
/// integer, a string and a nested composite value.
fn exercise_backend_parity(backend: &dyn Backend) {
    let integer = CachedValue::encode(&42u64).unwrap();
    let text = CachedValue::Text("plain".to_string());
    let nested = CachedValue::encode(&Report {
        title: "weekly".to_string(),
        totals: vec![1, 2, 3],
    })
    .unwrap();

    // Fresh keys start absent
    assert_eq!(backend.get("parity:integer").unwrap(), None);

    // Stored values come back in shape
    assert!(backend.set("parity:integer", integer.clone()).unwrap());
    assert!(backend.set("parity:text", text.clone()).unwrap());
    assert!(backend.set("parity:nested", nested.clone()).unwrap());

    let integer_back: u64 = backend.get("parity:integer").unwrap().unwrap().decode().unwrap();
    assert_eq!(integer_back, 42);

    let text_back: String = backend.get("parity:text").unwrap().unwrap().decode().unwrap();
    assert_eq!(text_back, "plain");

    let nested_back: Report = backend.get("parity:nested").unwrap().unwrap().decode().unwrap();
    assert_eq!(nested_back.title, "weekly");
    assert_eq!(nested_back.totals, vec![1, 2, 3]);

    // Overwrite wins
    assert!(backend
        .set("parity:integer", CachedValue::encode(&43u64).unwrap())
        .unwrap());
    let overwritten: u64 = backend.get("parity:integer").unwrap().unwrap().decode().unwrap();
    assert_eq!(overwritten, 43);

    // Delete round trip: set, delete, then absent
    assert!(backend.delete("parity:integer").unwrap());
    assert_eq!(backend.get("parity:integer").unwrap(), None);
    assert!(!backend.delete("parity:integer").unwrap());

    // Cleanup for repeatable runs against shared servers
    let _ = backend.delete("parity:text").unwrap();
    let _ = backend.delete("parity:nested").unwrap();
}

/// Wraps factorial over the backend and checks the miss/hit/recompute
/// sequence end to end.
fn exercise_factorial_scenario(backend: Arc<dyn Backend>) {
    let calls = Arc::new(AtomicUsize::new(0));

    let counted = calls.clone();
    let memo = memoize(backend, move |(n,): (u64,)| {
        counted.fetch_add(1, Ordering::SeqCst);
        factorial(n)
    });

    // Make sure shared servers hold no stale entries for these arguments
    let _ = memo.invalidate(&(10,)).unwrap();
    let _ = memo.invalidate(&(11,)).unwrap();

    // First call misses and computes
    assert_eq!(memo.call((10,)).unwrap(), 3_628_800);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Second call with equal arguments is served from the store
    assert_eq!(memo.call((10,)).unwrap(), 3_628_800);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // A different argument fingerprints differently and computes
    assert_eq!(memo.call((11,)).unwrap(), 39_916_800);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let stats = memo.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
}

// == Memory Backend Tests ==

#[test]
fn test_memory_backend_parity() {
    init_logging();
    let backend = MemoryBackend::new();
    exercise_backend_parity(&backend);
}

#[test]
fn test_memory_factorial_scenario() {
    init_logging();
    exercise_factorial_scenario(Arc::new(MemoryBackend::new()));
}

#[test]
fn test_named_arguments_share_one_entry() {
    init_logging();
    let backend = Arc::new(MemoryBackend::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let counted = calls.clone();
    let memo = memoize(backend, move |key: CallKey| {
        counted.fetch_add(1, Ordering::SeqCst);
        format!("rendered:{}", key.is_empty())
    });

    let forward = CallKey::new()
        .arg(&"report")
        .unwrap()
        .named("width", &80)
        .unwrap()
        .named("height", &25)
        .unwrap();
    let backward = CallKey::new()
        .arg(&"report")
        .unwrap()
        .named("height", &25)
        .unwrap()
        .named("width", &80)
        .unwrap();

    let first = memo.call(forward).unwrap();
    let second = memo.call(backward).unwrap();

    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cached_result_survives_wrapper_recreation() {
    init_logging();
    let backend: Arc<MemoryBackend> = Arc::new(MemoryBackend::new());
    let calls = Arc::new(AtomicUsize::new(0));

    {
        let counted = calls.clone();
        let memo = memoize(backend.clone() as Arc<dyn Backend>, move |(n,): (u64,)| {
            counted.fetch_add(1, Ordering::SeqCst);
            factorial(n)
        });
        assert_eq!(memo.call((12,)).unwrap(), 479_001_600);
    }

    // A new wrapper over the same backend sees the stored entry
    let counted = calls.clone();
    let memo = memoize(backend as Arc<dyn Backend>, move |(n,): (u64,)| {
        counted.fetch_add(1, Ordering::SeqCst);
        factorial(n)
    });
    assert_eq!(memo.call((12,)).unwrap(), 479_001_600);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_fingerprints_are_storage_safe_keys() {
    // Keys handed to backends are fixed-length hex, well under the
    // memcached protocol limit
    let key = CallKey::new().arg(&"anything").unwrap();
    let digest = memocache::fingerprint(&key.canonical()).unwrap();

    assert_eq!(digest.len(), FINGERPRINT_LENGTH);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
}

// == Live Server Suites ==
// These need reachable servers (REDIS_HOST/REDIS_PORT and
// MEMCACHED_HOST/MEMCACHED_PORT, defaulting to localhost).

#[test]
#[ignore]
fn test_redis_backend_parity() {
    init_logging();
    let backend =
        RedisBackend::connect(&RedisConfig::from_env()).expect("redis server reachable");
    exercise_backend_parity(&backend);
}

#[test]
#[ignore]
fn test_redis_factorial_scenario() {
    init_logging();
    let backend =
        RedisBackend::connect(&RedisConfig::from_env()).expect("redis server reachable");
    exercise_factorial_scenario(Arc::new(backend));
}

#[test]
#[ignore]
fn test_memcached_backend_parity() {
    init_logging();
    let backend = MemcachedBackend::connect(&MemcachedConfig::from_env())
        .expect("memcached construction is non-fatal");
    exercise_backend_parity(&backend);
}

#[test]
#[ignore]
fn test_memcached_factorial_scenario() {
    init_logging();
    let backend = MemcachedBackend::connect(&MemcachedConfig::from_env())
        .expect("memcached construction is non-fatal");
    exercise_factorial_scenario(Arc::new(backend));
}

#[test]
fn test_memcached_constructs_without_live_server() {
    init_logging();
    // Construction against a closed port warns and still yields a handle;
    // operations then fail with the backend's own error kind.
    let config = MemcachedConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        ..MemcachedConfig::default()
    };

    let backend = MemcachedBackend::connect(&config).unwrap();
    let result = backend.get("absent");
    assert!(matches!(
        result,
        Err(memocache::CacheError::MemcachedBackend(_))
    ));
}
