//! # dochub-entity
//!
//! Domain entity models for DocHub. A project owns one nested filetree of
//! folders, docs, and binary file references, stored denormalized as a
//! single document. This crate defines the wire format of that document,
//! the positional-path type used to address nodes inside it, and the pure
//! in-memory navigation/mutation helpers shared by the storage backends.

pub mod doc;
pub mod file;
pub mod folder;
pub mod path;
pub mod project;

pub use doc::Doc;
pub use file::{FileRef, LinkedFileData};
pub use folder::Folder;
pub use path::{MongoPath, PathStep, TreePath};
pub use project::{DeletedDoc, DeletedFile, Project};

pub use dochub_core::events::structure::EntityKind;

use serde::Serialize;

use dochub_core::types::EntityId;

/// A tree entity of any kind, as inserted into or removed from a folder.
///
/// Serializes to the bare node object of the wire format. Deliberately not
/// deserializable: the containing array determines a stored node's kind, so
/// reads always go through the typed folder arrays.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TreeEntity {
    /// A folder subtree.
    Folder(Folder),
    /// A binary file reference.
    File(FileRef),
    /// An editable doc.
    Doc(Doc),
}

impl TreeEntity {
    /// The entity's identifier.
    pub fn id(&self) -> EntityId {
        match self {
            Self::Doc(d) => d.id,
            Self::File(f) => f.id,
            Self::Folder(f) => f.id,
        }
    }

    /// The entity's name.
    pub fn name(&self) -> &str {
        match self {
            Self::Doc(d) => &d.name,
            Self::File(f) => &f.name,
            Self::Folder(f) => &f.name,
        }
    }

    /// The entity's kind.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Doc(_) => EntityKind::Doc,
            Self::File(_) => EntityKind::File,
            Self::Folder(_) => EntityKind::Folder,
        }
    }

    /// The entity's revision counter (zero for folders).
    pub fn rev(&self) -> i64 {
        match self {
            Self::Doc(d) => d.rev,
            Self::File(f) => f.rev,
            Self::Folder(_) => 0,
        }
    }
}

impl From<Doc> for TreeEntity {
    fn from(doc: Doc) -> Self {
        Self::Doc(doc)
    }
}

impl From<FileRef> for TreeEntity {
    fn from(file: FileRef) -> Self {
        Self::File(file)
    }
}

impl From<Folder> for TreeEntity {
    fn from(folder: Folder) -> Self {
        Self::Folder(folder)
    }
}
