//! Redis lock provider.

pub mod client;
pub mod lock;

pub use client::RedisClient;
pub use lock::RedisLockProvider;
