//! Structure-change payloads delivered to downstream consumers.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// The kind of a tree entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// An editable text document.
    Doc,
    /// A binary file reference.
    File,
    /// A folder.
    Folder,
}

impl EntityKind {
    /// The array field holding entities of this kind inside a stored folder.
    ///
    /// These names are part of the persisted wire format and must match the
    /// legacy document schema exactly.
    pub fn array_field(self) -> &'static str {
        match self {
            Self::Doc => "docs",
            Self::File => "fileRefs",
            Self::Folder => "folders",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Doc => write!(f, "doc"),
            Self::File => write!(f, "file"),
            Self::Folder => write!(f, "folder"),
        }
    }
}

/// One leaf entity together with its full filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    /// The entity's identifier.
    pub id: EntityId,
    /// Slash-separated path from the project root, e.g. `/chapters/one.tex`.
    pub path: String,
}

/// The before/after leaf-entity sets of one committed structural mutation.
///
/// Folders are not tracked separately; only the docs and files they contain
/// appear here. Consumers diff the old and new sets to re-derive their own
/// path caches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureChanges {
    /// Doc entries before the mutation.
    pub old_docs: Vec<PathEntry>,
    /// Doc entries after the mutation.
    pub new_docs: Vec<PathEntry>,
    /// File entries before the mutation.
    pub old_files: Vec<PathEntry>,
    /// File entries after the mutation.
    pub new_files: Vec<PathEntry>,
    /// The project version after the mutation committed.
    pub new_version: i64,
}

impl StructureChanges {
    /// Whether the mutation changed any leaf entity set at all.
    pub fn is_empty(&self) -> bool {
        self.old_docs == self.new_docs && self.old_files == self.new_files
    }
}
