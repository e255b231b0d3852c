//! Configuration Module
//!
//! Connection settings for the storage backends, loadable from environment
//! variables with sensible defaults.

use std::env;
use std::time::Duration;

// == Redis Config ==
/// Connection settings for the Redis backend.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Server hostname or IP address
    pub host: String,
    /// Server port
    pub port: u16,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Read timeout applied to the established connection
    pub read_timeout: Duration,
}

impl RedisConfig {
    /// Creates a new RedisConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_HOST` - Server hostname (default: 127.0.0.1)
    /// - `REDIS_PORT` - Server port (default: 6379)
    pub fn from_env() -> Self {
        Self {
            host: env::var("REDIS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("REDIS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(6379),
            ..Self::default()
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(5),
        }
    }
}

// == Memcached Config ==
/// Connection settings for the Memcached backend.
///
/// Defaults to short timeouts (1s connect, 500ms read).
#[derive(Debug, Clone)]
pub struct MemcachedConfig {
    /// Server hostname or IP address
    pub host: String,
    /// Server port
    pub port: u16,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Read and write timeout applied to the established connection
    pub read_timeout: Duration,
}

impl MemcachedConfig {
    /// Creates a new MemcachedConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMCACHED_HOST` - Server hostname (default: 127.0.0.1)
    /// - `MEMCACHED_PORT` - Server port (default: 11211)
    pub fn from_env() -> Self {
        Self {
            host: env::var("MEMCACHED_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("MEMCACHED_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(11211),
            ..Self::default()
        }
    }
}

impl Default for MemcachedConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 11211,
            connect_timeout: Duration::from_secs(1),
            read_timeout: Duration::from_millis(500),
        }
    }
}
