//! In-memory lock provider.

pub mod lock;

pub use lock::MemoryLockProvider;
