//! Memcached Backend Module
//!
//! Secondary storage adapter over the memcache protocol client. Payloads are
//! framed with a leading type code so raw text survives unmodified while
//! arbitrary values ride the generic binary serialization.

use std::sync::{Mutex, MutexGuard};

use memcache::Client;
use tracing::{debug, info, warn};

use crate::backend::{Backend, CachedValue, MEMCACHED_MAX_KEY_LENGTH};
use crate::config::MemcachedConfig;
use crate::error::{CacheError, Result};

// == Payload Type Codes ==
/// Raw text stored unmodified after the code byte
const FORMAT_TEXT: u8 = 1;
/// Generic binary serialization after the code byte
const FORMAT_BINARY: u8 = 2;

// == Memcached Backend ==
/// Storage adapter over a memcached connection.
///
/// Construction probes the server but only warns when it is unreachable; the
/// handle stays usable and operations reconnect lazily, failing with a
/// backend error for as long as the server stays down.
pub struct MemcachedBackend {
    /// Connection settings, kept for reconnects and error messages
    config: MemcachedConfig,
    /// Established client, absent until a connection attempt succeeds
    client: Mutex<Option<Client>>,
}

impl MemcachedBackend {
    // == Constructor ==
    /// Connects to the Memcached server described by `config`.
    ///
    /// A failed probe is non-fatal: the handle is returned anyway and each
    /// operation retries the connection.
    pub fn connect(config: &MemcachedConfig) -> Result<Self> {
        let client = match probe_client(config) {
            Ok(client) => {
                info!(
                    "Connected to memcached backend {}:{}",
                    config.host, config.port
                );
                Some(client)
            }
            Err(e) => {
                warn!(
                    "Error connecting to memcached server {}:{}: {}",
                    config.host, config.port, e
                );
                None
            }
        };

        Ok(Self {
            config: config.clone(),
            client: Mutex::new(client),
        })
    }

    // == Liveness ==
    /// Returns a client that just answered a version probe, reconnecting if
    /// the established one has gone stale.
    fn live_client(&self) -> Result<MutexGuard<'_, Option<Client>>> {
        let mut guard = self
            .client
            .lock()
            .map_err(|_| CacheError::Internal("Memcached backend lock poisoned".to_string()))?;

        let stale = match guard.as_ref() {
            Some(client) => client.version().is_err(),
            None => true,
        };
        if stale {
            debug!(
                "Memcached connection stale, reconnecting to {}:{}",
                self.config.host, self.config.port
            );
            *guard = Some(probe_client(&self.config)?);
        }

        Ok(guard)
    }
}

impl Backend for MemcachedBackend {
    fn get(&self, key: &str) -> Result<Option<CachedValue>> {
        validate_key(key)?;
        let guard = self.live_client()?;
        let Some(client) = guard.as_ref() else {
            return Err(CacheError::Internal(
                "Memcached client missing after reconnect".to_string(),
            ));
        };

        let raw: Option<Vec<u8>> = client
            .get(key)
            .map_err(|e| operation_error(&self.config, &e))?;
        raw.map(|bytes| decode_payload(&bytes)).transpose()
    }

    fn set(&self, key: &str, value: CachedValue) -> Result<bool> {
        validate_key(key)?;
        let framed = encode_payload(&value);

        let guard = self.live_client()?;
        let Some(client) = guard.as_ref() else {
            return Err(CacheError::Internal(
                "Memcached client missing after reconnect".to_string(),
            ));
        };

        client
            .set(key, framed.as_slice(), 0)
            .map_err(|e| operation_error(&self.config, &e))?;
        Ok(true)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let guard = self.live_client()?;
        let Some(client) = guard.as_ref() else {
            return Err(CacheError::Internal(
                "Memcached client missing after reconnect".to_string(),
            ));
        };

        client
            .delete(key)
            .map_err(|e| operation_error(&self.config, &e))
    }
}

// == Key Validation ==
/// Rejects keys the memcached protocol cannot store.
fn validate_key(key: &str) -> Result<()> {
    if key.len() > MEMCACHED_MAX_KEY_LENGTH {
        return Err(CacheError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MEMCACHED_MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

// == Payload Framing ==
/// Frames a payload with its leading type code.
fn encode_payload(value: &CachedValue) -> Vec<u8> {
    match value {
        CachedValue::Text(text) => {
            let mut framed = Vec::with_capacity(1 + text.len());
            framed.push(FORMAT_TEXT);
            framed.extend_from_slice(text.as_bytes());
            framed
        }
        CachedValue::Blob(bytes) => {
            let mut framed = Vec::with_capacity(1 + bytes.len());
            framed.push(FORMAT_BINARY);
            framed.extend_from_slice(bytes);
            framed
        }
    }
}

/// Recovers a payload by dispatching on its leading type code.
fn decode_payload(raw: &[u8]) -> Result<CachedValue> {
    match raw.split_first() {
        Some((&FORMAT_TEXT, rest)) => String::from_utf8(rest.to_vec())
            .map(CachedValue::Text)
            .map_err(|e| CacheError::Serialization(format!("Invalid text payload: {}", e))),
        Some((&FORMAT_BINARY, rest)) => Ok(CachedValue::Blob(rest.to_vec())),
        Some((&code, _)) => Err(CacheError::Serialization(format!(
            "Unknown value format code: {}",
            code
        ))),
        None => Err(CacheError::Serialization("Empty payload".to_string())),
    }
}

// == Connection Helpers ==
/// Opens a client, applies timeouts and verifies the server answers a
/// version request.
fn probe_client(config: &MemcachedConfig) -> Result<Client> {
    let url = format!(
        "memcache://{}:{}?connect_timeout={}",
        config.host,
        config.port,
        config.connect_timeout.as_secs_f64()
    );
    let client = Client::connect(url).map_err(|e| connection_error(config, &e))?;
    client
        .set_read_timeout(Some(config.read_timeout))
        .map_err(|e| connection_error(config, &e))?;
    client
        .set_write_timeout(Some(config.read_timeout))
        .map_err(|e| connection_error(config, &e))?;
    client
        .version()
        .map_err(|e| connection_error(config, &e))?;
    Ok(client)
}

// == Error Helpers ==
fn connection_error(config: &MemcachedConfig, source: &memcache::MemcacheError) -> CacheError {
    CacheError::MemcachedBackend(format!(
        "Error connecting to memcached server {}:{}: {}",
        config.host, config.port, source
    ))
}

fn operation_error(config: &MemcachedConfig, source: &memcache::MemcacheError) -> CacheError {
    CacheError::MemcachedBackend(format!(
        "Memcached operation failed against {}:{}: {}",
        config.host, config.port, source
    ))
}
