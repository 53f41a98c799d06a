//! Abstract contracts for every external collaborator of the mutation
//! engine.
//!
//! The engine itself only ever talks to these traits; concrete transports
//! (HTTP clients, queue producers) live outside this repository.

pub mod content_sync;
pub mod cooldown;
pub mod docstore;
pub mod filestore;
pub mod history;
pub mod lock;
pub mod tpds;

pub use content_sync::ContentSyncClient;
pub use cooldown::CooldownSignal;
pub use docstore::DocstoreClient;
pub use filestore::FileStoreClient;
pub use history::HistoryClient;
pub use lock::{LockProvider, run_with_lock};
pub use tpds::TpdsClient;
