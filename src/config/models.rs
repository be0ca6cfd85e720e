//! Configuration data structures for the cachewise client.
//!
//! This module defines the schema for the client settings: HTTP timeouts
//! and pooling, the optional disk cache, and logging output.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The root configuration object for the client.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// HTTP transport settings (timeouts, pooling).
    #[serde(default)]
    pub http: HttpConfig,

    /// Disk cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the underlying HTTP transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// TCP connect timeout in seconds.
    /// Default: `10`
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Read timeout in seconds, applied between bytes of the response.
    /// Default: `30`
    #[serde(default = "default_read_timeout")]
    pub read_timeout_seconds: u64,

    /// Maximum number of idle connections to keep per host.
    /// Default: `10`
    #[serde(default = "default_pool_size")]
    pub pool_max_idle_per_host: usize,

    /// TCP keepalive interval in seconds.
    /// Default: `60`
    #[serde(default = "default_keepalive")]
    pub tcp_keepalive_seconds: u64,
}

/// Settings for the disk-backed response cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Storage directory for cached responses. Caching is disabled when
    /// unset; the client creates a `http_cache` subdirectory inside it.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Maximum total size of the cache in bytes.
    /// Default: `52428800` (50 MiB)
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Whether to log each HTTP exchange (request line, response status)
    /// at debug level.
    /// Default: `false`
    #[serde(default)]
    pub log_exchanges: bool,
}

// Default trait implementations linking to custom logic

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: default_connect_timeout(),
            read_timeout_seconds: default_read_timeout(),
            pool_max_idle_per_host: default_pool_size(),
            tcp_keepalive_seconds: default_keepalive(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: None,
            max_size_bytes: default_max_size_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_exchanges: false,
        }
    }
}

// Helper functions for serde defaults and shared constants

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    30
}

fn default_pool_size() -> usize {
    10
}

fn default_keepalive() -> u64 {
    60
}

fn default_max_size_bytes() -> u64 {
    50 * 1024 * 1024 // 50 MiB
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
