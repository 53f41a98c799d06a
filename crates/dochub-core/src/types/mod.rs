//! Shared type definitions used across all DocHub crates.

pub mod id;

pub use id::{EntityId, ProjectId, UserId};
