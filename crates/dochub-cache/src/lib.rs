//! # dochub-cache
//!
//! Per-project lock providers for DocHub. Supports two modes:
//!
//! - **memory**: In-process locks for tests and single-instance deployments
//! - **redis**: Lease-based distributed locks using the
//!   [redis](https://crates.io/crates/redis) crate, for clustered deployments
//!
//! The provider is selected at runtime based on configuration. Both
//! implement [`dochub_core::traits::LockProvider`]: bounded-wait acquire
//! surfacing `LockTimeout`, and a liveness lease that auto-releases a
//! crashed holder's lock.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::LockManager;
