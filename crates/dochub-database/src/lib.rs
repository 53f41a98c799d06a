//! # dochub-database
//!
//! Storage backends for the project tree document. Every structural write
//! is a single conditional update: it targets a positional path computed
//! from a snapshot, guards on that path still resolving, and increments
//! the project version. The guard is defense-in-depth behind the
//! per-project lock; a failed guard means the snapshot went stale and the
//! caller must re-resolve from scratch.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryProjectStore;
pub use repositories::project::PgProjectStore;
pub use store::{ProjectStore, TreeSelection};
