//! References to leaves removed from the tree.
//!
//! The tree is the only place a doc or file reference lives, so deleting a
//! leaf without a trace would orphan its external content. These records
//! let the docstore and history service garbage collect later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dochub_core::types::EntityId;

use crate::doc::Doc;
use crate::file::{FileRef, LinkedFileData};

/// A doc that was removed from the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedDoc {
    /// The doc's identifier.
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// The doc's name at deletion time.
    pub name: String,
    /// When the doc was removed.
    pub deleted_at: DateTime<Utc>,
}

impl DeletedDoc {
    /// Record a doc as deleted now.
    pub fn from_doc(doc: &Doc) -> Self {
        Self {
            id: doc.id,
            name: doc.name.clone(),
            deleted_at: Utc::now(),
        }
    }
}

/// A file reference that was removed from the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedFile {
    /// The file's identifier.
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// The file's name at deletion time.
    pub name: String,
    /// Content hash into the blob store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Import provenance, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_file_data: Option<LinkedFileData>,
    /// When the file was removed.
    pub deleted_at: DateTime<Utc>,
}

impl DeletedFile {
    /// Record a file as deleted now.
    pub fn from_file(file: &FileRef) -> Self {
        Self {
            id: file.id,
            name: file.name.clone(),
            hash: file.hash.clone(),
            linked_file_data: file.linked_file_data.clone(),
            deleted_at: Utc::now(),
        }
    }
}
