//! Doc entity model.

use serde::{Deserialize, Serialize};

use dochub_core::types::EntityId;

/// An editable text document in the filetree.
///
/// The tree only holds the reference; content lines live in the external
/// docstore. Field names follow the persisted legacy wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doc {
    /// Unique doc identifier.
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Doc name, unique among its folder's direct children.
    pub name: String,
    /// Revision counter, incremented by content updates.
    #[serde(default)]
    pub rev: i64,
}

impl Doc {
    /// Create a new doc reference with a fresh identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            rev: 0,
        }
    }
}
