//! Lock manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use dochub_core::config::lock::LockConfig;
use dochub_core::error::AppError;
use dochub_core::result::AppResult;
use dochub_core::traits::lock::LockProvider;

/// Lock manager that wraps the configured lock provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Clone)]
pub struct LockManager {
    /// The inner lock provider.
    inner: Arc<dyn LockProvider>,
}

impl LockManager {
    /// Create a new lock manager from configuration.
    pub async fn new(config: &LockConfig) -> AppResult<Self> {
        let inner: Arc<dyn LockProvider> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis lock provider");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisLockProvider::new(client, config))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory lock provider");
                Arc::new(crate::memory::MemoryLockProvider::new(config))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown lock provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a lock manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn LockProvider>) -> Self {
        Self { inner: provider }
    }
}

#[async_trait]
impl LockProvider for LockManager {
    async fn acquire(&self, namespace: &str, key: &str) -> AppResult<String> {
        self.inner.acquire(namespace, key).await
    }

    async fn release(&self, namespace: &str, key: &str, token: &str) -> AppResult<()> {
        self.inner.release(namespace, key, token).await
    }
}
