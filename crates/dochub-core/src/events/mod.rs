//! Cross-service event payloads produced by DocHub operations.
//!
//! Structure-change payloads are built once per committed mutation and
//! forwarded to the content-sync engine and the third-party mirror by the
//! structure-change notifier.

pub mod structure;

pub use structure::{EntityKind, PathEntry, StructureChanges};
