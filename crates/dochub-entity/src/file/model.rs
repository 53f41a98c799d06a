//! File reference entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dochub_core::types::EntityId;

/// Provenance of a file imported from an external source.
///
/// The provider name selects the import mechanism; the remaining fields are
/// provider-specific and carried opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedFileData {
    /// The import provider, e.g. `"url"` or `"project_file"`.
    pub provider: String,
    /// Provider-specific provenance fields.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// A binary file in the filetree.
///
/// Content is stored in the external content-addressed blob store; the tree
/// holds only the hash reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    /// Unique file identifier.
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// File name, unique among its folder's direct children.
    pub name: String,
    /// Content hash referencing the blob store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Provenance of imported files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_file_data: Option<LinkedFileData>,
    /// Revision counter, incremented when the content is replaced in place.
    #[serde(default)]
    pub rev: i64,
    /// Creation timestamp.
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
}

impl FileRef {
    /// Create a new file reference with a fresh identifier.
    pub fn new(name: impl Into<String>, hash: Option<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            hash,
            linked_file_data: None,
            rev: 0,
            created: Utc::now(),
        }
    }

    /// Attach import provenance.
    pub fn with_linked_file_data(mut self, data: LinkedFileData) -> Self {
        self.linked_file_data = Some(data);
        self
    }
}
