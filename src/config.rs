//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::registry::TtlPolicy;
use crate::cache::DEFAULT_PREFIX;

/// Which session storage backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Session-scoped in-memory storage
    Session,
    /// Storage that always misses, for hosts without a session store
    Disabled,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Session => "session",
            StorageBackend::Disabled => "disabled",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "session" | "memory" => Ok(StorageBackend::Session),
            "disabled" | "none" | "null" => Ok(StorageBackend::Disabled),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix applied to every logical cache key
    pub key_prefix: String,
    /// Storage backend selection
    pub backend: StorageBackend,
    /// Byte quota for the session store, None = unlimited
    pub quota_bytes: Option<usize>,
    /// TTL tiers in milliseconds
    pub ttl: TtlPolicy,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_PREFIX` - Physical key prefix (default: `spd_cache_`)
    /// - `CACHE_BACKEND` - `session` or `disabled` (default: session)
    /// - `CACHE_QUOTA_BYTES` - Session store quota, 0 = unlimited (default: 5 MiB)
    /// - `TTL_SHORT_MS` / `TTL_MEDIUM_MS` / `TTL_LONG_MS` - TTL tiers
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let quota_bytes = match parse_var::<usize>("CACHE_QUOTA_BYTES") {
            Some(0) => None,
            Some(n) => Some(n),
            None => defaults.quota_bytes,
        };

        Self {
            key_prefix: env::var("CACHE_PREFIX")
                .ok()
                .filter(|p| !p.is_empty())
                .unwrap_or(defaults.key_prefix),
            backend: parse_var("CACHE_BACKEND").unwrap_or(defaults.backend),
            quota_bytes,
            ttl: TtlPolicy {
                short_ms: parse_ttl("TTL_SHORT_MS").unwrap_or(defaults.ttl.short_ms),
                medium_ms: parse_ttl("TTL_MEDIUM_MS").unwrap_or(defaults.ttl.medium_ms),
                long_ms: parse_ttl("TTL_LONG_MS").unwrap_or(defaults.ttl.long_ms),
            },
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var::<u64>("CLEANUP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

// TTLs must stay positive
fn parse_ttl(name: &str) -> Option<u64> {
    parse_var::<u64>(name).filter(|ms| *ms > 0)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_PREFIX.to_string(),
            backend: StorageBackend::Session,
            quota_bytes: Some(5 * 1024 * 1024),
            ttl: TtlPolicy::default(),
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}
