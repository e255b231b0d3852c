//! Key Module
//!
//! Canonical call-argument encoding and fingerprinting for cache keys.

mod call_key;
mod encoder;
mod fingerprint;


// Re-export public types
pub use call_key::{CacheArgs, CallKey};
pub use encoder::{DefaultKeyEncoder, KeyEncoder};
pub use fingerprint::fingerprint;

// == Public Constants ==
/// Length in characters of a hex-encoded fingerprint (SHA-224)
pub const FINGERPRINT_LENGTH: usize = 56;
