//! In-process lock provider backed by a dashmap.
//!
//! Mirrors the Redis provider's lease semantics (including expiry stealing)
//! so tests exercise the same acquisition behavior the clustered provider
//! has in production.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, warn};
use uuid::Uuid;

use dochub_core::config::lock::LockConfig;
use dochub_core::error::AppError;
use dochub_core::result::AppResult;
use dochub_core::traits::lock::LockProvider;

use crate::keys;

/// The current holder of one lock key.
#[derive(Debug, Clone)]
struct Holder {
    token: String,
    expires_at: Instant,
}

/// In-memory lock provider.
#[derive(Debug)]
pub struct MemoryLockProvider {
    holders: DashMap<String, Holder>,
    acquire_timeout: Duration,
    lease_ttl: Duration,
    poll_interval: Duration,
}

impl MemoryLockProvider {
    /// Create a new in-memory lock provider from configuration.
    pub fn new(config: &LockConfig) -> Self {
        Self {
            holders: DashMap::new(),
            acquire_timeout: Duration::from_millis(config.acquire_timeout_ms),
            lease_ttl: Duration::from_millis(config.lease_ttl_ms),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }

    /// Attempt a single non-blocking acquisition.
    fn try_acquire(&self, full_key: &str, token: &str) -> bool {
        let now = Instant::now();
        match self.holders.entry(full_key.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(Holder {
                    token: token.to_string(),
                    expires_at: now + self.lease_ttl,
                });
                true
            }
            Entry::Occupied(mut entry) => {
                if entry.get().expires_at <= now {
                    // Lease expired; the previous holder crashed or stalled.
                    warn!(key = full_key, "Taking over expired lock lease");
                    entry.insert(Holder {
                        token: token.to_string(),
                        expires_at: now + self.lease_ttl,
                    });
                    true
                } else {
                    false
                }
            }
        }
    }
}

#[async_trait]
impl LockProvider for MemoryLockProvider {
    async fn acquire(&self, namespace: &str, key: &str) -> AppResult<String> {
        let full_key = keys::lock_key(namespace, key);
        let token = Uuid::new_v4().to_string();
        let deadline = Instant::now() + self.acquire_timeout;

        loop {
            if self.try_acquire(&full_key, &token) {
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
        let full_key = keys::lock_key(namespace, key);
        // Remove only when we are still the holder; an expired lease may
        // already belong to someone else.
        self.holders
            .remove_if(&full_key, |_, holder| holder.token == token);
        Ok(())
    }
}

/// Add up to 50% random jitter so contending waiters do not poll in step.
fn jittered(base: Duration) -> Duration {
    let factor = 1.0 + rand::random::<f64>() * 0.5;
    base.mul_f64(factor)
}
