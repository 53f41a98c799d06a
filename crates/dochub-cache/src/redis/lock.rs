//! Lease-based distributed lock on Redis.
//!
//! Acquire is `SET key token PX lease NX` in a bounded polling loop;
//! release deletes the key only if the token still matches, via a small
//! Lua script, so a holder whose lease already expired cannot evict the
//! next holder.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use dochub_core::config::lock::LockConfig;
use dochub_core::error::{AppError, ErrorKind};
use dochub_core::result::AppResult;
use dochub_core::traits::lock::LockProvider;

use crate::keys;

use super::client::RedisClient;

const RELEASE_SCRIPT: &str = r#"
if redis.call("get", KEYS[1]) == ARGV[1] then
    return redis.call("del", KEYS[1])
else
    return 0
end
"#;

/// Redis-backed lock provider.
#[derive(Debug, Clone)]
pub struct RedisLockProvider {
    /// Redis client.
    client: RedisClient,
    /// Bounded wait for acquisition.
    acquire_timeout: Duration,
    /// Liveness lease for each acquired lock.
    lease_ttl: Duration,
    /// Base polling interval between attempts.
    poll_interval: Duration,
}

impl RedisLockProvider {
    /// Create a new Redis lock provider.
    pub fn new(client: RedisClient, config: &LockConfig) -> Self {
        Self {
            client,
            acquire_timeout: Duration::from_millis(config.acquire_timeout_ms),
            lease_ttl: Duration::from_millis(config.lease_ttl_ms),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl LockProvider for RedisLockProvider {
    async fn acquire(&self, namespace: &str, key: &str) -> AppResult<String> {
        let full_key = self.client.prefixed_key(&keys::lock_key(namespace, key));
        let token = Uuid::new_v4().to_string();
        let deadline = Instant::now() + self.acquire_timeout;
        let mut conn = self.client.conn_mut();

        loop {
            // SET key token PX lease NX
            let result: Option<String> = redis::cmd("SET")
                .arg(&full_key)
                .arg(&token)
                .arg("PX")
                .arg(self.lease_ttl.as_millis() as u64)
                .arg("NX")
                .query_async(&mut conn)
                .await
                .map_err(Self::map_err)?;

            if result.is_some() {
                debug!(key = %full_key, "Acquired lock");
                return Ok(token);
            }
            if Instant::now() >= deadline {
                return Err(AppError::lock_timeout(format!(
                    "could not acquire lock {full_key} within {:?}",
                    self.acquire_timeout
                )));
            }
            tokio::time::sleep(jittered(self.poll_interval)).await;
        }
    }

    async fn release(&self, namespace: &str, key: &str, token: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(&keys::lock_key(namespace, key));
        let mut conn = self.client.conn_mut();
        let _deleted: i64 = redis::Script::new(RELEASE_SCRIPT)
            .key(&full_key)
            .arg(token)
            .invoke_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}

/// Add up to 50% random jitter so contending waiters do not poll in step.
fn jittered(base: Duration) -> Duration {
    let factor = 1.0 + rand::random::<f64>() * 0.5;
    base.mul_f64(factor)
}
