//! In-memory project store for tests and single-node development.

pub mod store;

pub use store::MemoryProjectStore;
