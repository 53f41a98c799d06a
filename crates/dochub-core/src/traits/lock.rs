//! Distributed mutual exclusion keyed by `(namespace, key)`.

use std::future::Future;

use async_trait::async_trait;
use tracing::warn;

use crate::result::AppResult;

/// A provider of distributed locks.
///
/// At most one holder exists concurrently for a given `(namespace, key)`
/// pair, cluster-wide. Acquisition blocks for a bounded interval and fails
/// with a `LockTimeout` error when the interval expires; callers treat that
/// as retryable. The lock carries a liveness lease so a crashed holder
/// cannot block the key forever.
#[async_trait]
pub trait LockProvider: Send + Sync + 'static {
    /// Acquire the lock, waiting up to the provider's configured bound.
    ///
    /// Returns an opaque holder token that must be presented on release.
    async fn acquire(&self, namespace: &str, key: &str) -> AppResult<String>;

    /// Release a previously acquired lock.
    ///
    /// The release is a no-op when `token` no longer matches the current
    /// holder (the lease expired and someone else took the lock).
    async fn release(&self, namespace: &str, key: &str, token: &str) -> AppResult<()>;
}

/// Run `f` while holding the `(namespace, key)` lock.
///
/// The lock is released whether `f` succeeds or fails. A release failure
/// after `f` completed is logged and swallowed: the lease TTL guarantees
/// eventual release, and masking `f`'s result would lose the caller's
/// actual outcome.
///
/// Nested steps of an operation already holding the lock must call the
/// "without lock" variant of the wrapped function instead of re-entering
/// here, which would deadlock.
pub async fn run_with_lock<P, F, Fut, T>(
    provider: &P,
    namespace: &str,
    key: &str,
    f: F,
) -> AppResult<T>
where
    P: LockProvider + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let token = provider.acquire(namespace, key).await?;
    let result = f().await;
    if let Err(err) = provider.release(namespace, key, &token).await {
        warn!(namespace, key, error = %err, "Failed to release lock; lease will expire");
    }
    result
}
