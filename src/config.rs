//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::cache::DEFAULT_TTL_MS;
use crate::validation::MessagePolicy;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Lifetime of cached reads in milliseconds (`<= 0` = never expire)
    pub cache_ttl_ms: i64,
    /// Attempts per remote call, first one included
    pub retry_max_attempts: u32,
    /// Backoff unit in milliseconds; attempt `n` waits `n` times this
    pub retry_base_delay_ms: u64,
    /// Global switch for schema validation
    pub validation_enabled: bool,
    /// Which message is kept when several rules fail on one field
    pub message_policy: MessagePolicy,
    /// HTTP server port
    pub server_port: u16,
    /// Expired-entry sweep interval in seconds, 0 = lazy eviction only
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - Cache entry lifetime (default: 300000)
    /// - `RETRY_MAX_ATTEMPTS` - Attempts per remote call (default: 3)
    /// - `RETRY_BASE_DELAY_MS` - Backoff unit (default: 1000)
    /// - `VALIDATION_ENABLED` - `true`/`false` (default: true)
    /// - `VALIDATION_MESSAGE_POLICY` - `last`, `first` or `all` (default: last)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_ttl_ms: env_or("CACHE_TTL_MS", defaults.cache_ttl_ms),
            retry_max_attempts: env_or("RETRY_MAX_ATTEMPTS", defaults.retry_max_attempts),
            retry_base_delay_ms: env_or("RETRY_BASE_DELAY_MS", defaults.retry_base_delay_ms),
            validation_enabled: env_or("VALIDATION_ENABLED", defaults.validation_enabled),
            message_policy: env_or("VALIDATION_MESSAGE_POLICY", defaults.message_policy),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }
}

/// Parses `name` from the environment, falling back to `default` when unset or malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, "ignoring malformed environment value");
            default
        }),
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_ms: DEFAULT_TTL_MS,
            retry_max_attempts: 3,
            retry_base_delay_ms: 1000,
            validation_enabled: true,
            message_policy: MessagePolicy::LastWins,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}
