//! Fingerprint Module
//!
//! Deterministic serialization and hashing of canonical argument trees.

use serde_json::Value;
use sha2::{Digest, Sha224};

use crate::error::{CacheError, Result};

// == Fingerprint ==
/// Computes the SHA-224 hex fingerprint of a canonical value tree.
///
/// Serialization is deterministic: arrays keep insertion order and maps in
/// the canonical tree are already sorted, so equal trees produce
/// byte-identical bytes and therefore identical digests across runs and
/// processes.
///
/// # Arguments
/// * `canonical` - The canonical tree produced by a key encoder
///
/// # Returns
/// A 56-character lowercase hex digest.
pub fn fingerprint(canonical: &Value) -> Result<String> {
    let serialized = serde_json::to_vec(canonical).map_err(|e| {
        CacheError::KeyEncoding(format!("Canonical key is not serializable: {}", e))
    })?;

    let mut hasher = Sha224::new();
    hasher.update(&serialized);
    Ok(format!("{:x}", hasher.finalize()))
}
