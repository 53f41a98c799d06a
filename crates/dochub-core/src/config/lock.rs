//! Per-project lock configuration.

use serde::{Deserialize, Serialize};

/// Top-level lock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    /// Lock provider type: `"memory"` or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Bounded wait for acquisition, in milliseconds. Expiry surfaces as a
    /// retryable `LockTimeout` error.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_ms: u64,
    /// Liveness lease, in milliseconds. A crashed holder's lock auto-releases
    /// after this long.
    #[serde(default = "default_lease_ttl")]
    pub lease_ttl_ms: u64,
    /// Base polling interval between acquisition attempts, in milliseconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Redis-specific lock configuration.
    #[serde(default)]
    pub redis: RedisLockConfig,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            acquire_timeout_ms: default_acquire_timeout(),
            lease_ttl_ms: default_lease_ttl(),
            poll_interval_ms: default_poll_interval(),
            redis: RedisLockConfig::default(),
        }
    }
}

/// Redis lock backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisLockConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Key prefix for all DocHub lock keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisLockConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_acquire_timeout() -> u64 {
    30_000
}

fn default_lease_ttl() -> u64 {
    60_000
}

fn default_poll_interval() -> u64 {
    50
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "dochub:".to_string()
}
