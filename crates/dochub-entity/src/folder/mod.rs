//! Folder entities and in-memory tree operations.

pub mod model;

pub use model::Folder;
