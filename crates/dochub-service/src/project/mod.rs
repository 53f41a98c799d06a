//! Project lifecycle operations built on the mutation engine.

pub mod service;

pub use service::ProjectService;
