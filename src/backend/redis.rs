//! Redis Backend Module
//!
//! Primary storage adapter over the synchronous redis client. Payloads are
//! stored as their generic binary serialization and retrieved symmetrically.

use std::sync::{Mutex, MutexGuard};

use redis::{Commands, Connection};
use tracing::{debug, info, warn};

use crate::backend::{Backend, CachedValue};
use crate::config::RedisConfig;
use crate::error::{CacheError, Result};

// == Redis Backend ==
/// Storage adapter over a live Redis connection.
///
/// Construction probes the server and fails hard when it is unreachable.
/// Every operation re-validates liveness with a PING and reconnects once
/// before giving up, so a server that dropped and recovered is picked up
/// again on the next call.
pub struct RedisBackend {
    /// Connection settings, kept for reconnects and error messages
    config: RedisConfig,
    /// Client handle used to open fresh connections
    client: redis::Client,
    /// Established connection
    connection: Mutex<Connection>,
}

impl RedisBackend {
    // == Constructor ==
    /// Connects to the Redis server described by `config`.
    ///
    /// Performs an immediate PING probe; an unreachable server is a hard
    /// construction failure rather than an unusable handle.
    pub fn connect(config: &RedisConfig) -> Result<Self> {
        let url = format!("redis://{}:{}/", config.host, config.port);
        let client =
            redis::Client::open(url.as_str()).map_err(|e| connection_error(config, &e))?;

        let connection = match open_connection(&client, config) {
            Ok(connection) => connection,
            Err(e) => {
                warn!(
                    "Failed to connect to redis server {}:{}",
                    config.host, config.port
                );
                return Err(e);
            }
        };

        info!(
            "Connected to redis backend {}:{}",
            config.host, config.port
        );

        Ok(Self {
            config: config.clone(),
            client,
            connection: Mutex::new(connection),
        })
    }

    // == Liveness ==
    /// Returns a connection that just answered a PING, reconnecting once if
    /// the established one has gone stale.
    fn live_connection(&self) -> Result<MutexGuard<'_, Connection>> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| CacheError::Internal("Redis backend lock poisoned".to_string()))?;

        if redis::cmd("PING").query::<String>(&mut *guard).is_ok() {
            return Ok(guard);
        }

        debug!(
            "Redis connection stale, reconnecting to {}:{}",
            self.config.host, self.config.port
        );
        *guard = open_connection(&self.client, &self.config)?;
        Ok(guard)
    }
}

impl Backend for RedisBackend {
    fn get(&self, key: &str) -> Result<Option<CachedValue>> {
        let mut connection = self.live_connection()?;

        let raw: Option<Vec<u8>> = connection
            .get(key)
            .map_err(|e| operation_error(&self.config, &e))?;

        raw.map(|bytes| {
            bincode::deserialize(&bytes).map_err(|e| {
                CacheError::Serialization(format!("Failed to decode stored value: {}", e))
            })
        })
        .transpose()
    }

    fn set(&self, key: &str, value: CachedValue) -> Result<bool> {
        let bytes = bincode::serialize(&value)
            .map_err(|e| CacheError::Serialization(format!("Failed to encode value: {}", e)))?;

        let mut connection = self.live_connection()?;
        let _: () = connection
            .set(key, bytes)
            .map_err(|e| operation_error(&self.config, &e))?;
        Ok(true)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let mut connection = self.live_connection()?;

        let removed: i64 = connection
            .del(key)
            .map_err(|e| operation_error(&self.config, &e))?;
        Ok(removed > 0)
    }
}

// == Connection Helpers ==
/// Opens a fresh connection, applies the read timeout and verifies it with
/// a PING.
fn open_connection(client: &redis::Client, config: &RedisConfig) -> Result<Connection> {
    let mut connection = client
        .get_connection_with_timeout(config.connect_timeout)
        .map_err(|e| connection_error(config, &e))?;
    connection
        .set_read_timeout(Some(config.read_timeout))
        .map_err(|e| connection_error(config, &e))?;
    redis::cmd("PING")
        .query::<String>(&mut connection)
        .map_err(|e| connection_error(config, &e))?;
    Ok(connection)
}

// == Error Helpers ==
fn connection_error(config: &RedisConfig, source: &redis::RedisError) -> CacheError {
    CacheError::RedisBackend(format!(
        "Failed to connect to redis backend {}:{}: {}",
        config.host, config.port, source
    ))
}

fn operation_error(config: &RedisConfig, source: &redis::RedisError) -> CacheError {
    CacheError::RedisBackend(format!(
        "Redis operation failed against {}:{}: {}",
        config.host, config.port, source
    ))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    // Live-server behavior is covered by the ignored integration tests.

    #[test]
    fn test_connection_error_names_the_server() {
        let config = RedisConfig::default();
        let source = redis::RedisError::from((redis::ErrorKind::IoError, "connection refused"));

        let error = connection_error(&config, &source);
        let message = error.to_string();

        assert!(message.contains("127.0.0.1:6379"));
        assert!(matches!(error, CacheError::RedisBackend(_)));
    }

    #[test]
    fn test_operation_error_names_the_server() {
        let config = RedisConfig::default();
        let source = redis::RedisError::from((redis::ErrorKind::ResponseError, "timed out"));

        let error = operation_error(&config, &source);
        assert!(error.to_string().contains("127.0.0.1:6379"));
    }
}
