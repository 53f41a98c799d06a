//! Folder entity model and nested-tree navigation.

use serde::{Deserialize, Serialize};

use dochub_core::events::structure::EntityKind;
use dochub_core::types::EntityId;

use crate::TreeEntity;
use crate::doc::Doc;
use crate::file::FileRef;
use crate::path::{MongoPath, PathStep};

/// A folder node in the filetree.
///
/// Legacy imports sometimes stored folders with one or more child arrays
/// missing entirely. The `#[serde(default)]` markers normalize that at the
/// deserialization boundary: after load, every folder always has all three
/// arrays, so traversal code never has to treat a missing array as a
/// special case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier.
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Folder name, unique among its parent's direct children.
    pub name: String,
    /// Child folders, in insertion order.
    #[serde(default)]
    pub folders: Vec<Folder>,
    /// Child docs, in insertion order.
    #[serde(default)]
    pub docs: Vec<Doc>,
    /// Child file references, in insertion order.
    #[serde(default)]
    pub file_refs: Vec<FileRef>,
}

impl Folder {
    /// Create a new empty folder with a fresh identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            folders: Vec::new(),
            docs: Vec::new(),
            file_refs: Vec::new(),
        }
    }

    /// Create the root folder of a brand-new project.
    pub fn new_root() -> Self {
        Self::new("rootFolder")
    }

    /// Whether the folder has no direct children of any kind.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.docs.is_empty() && self.file_refs.is_empty()
    }

    /// Count all entities (docs + files + folders) in this subtree,
    /// excluding the folder itself.
    pub fn count_entities(&self) -> usize {
        let mut total = self.docs.len() + self.file_refs.len() + self.folders.len();
        for folder in &self.folders {
            total += folder.count_entities();
        }
        total
    }

    /// Whether any direct child (doc, file, or folder) has exactly this
    /// name. Exact-case comparison.
    pub fn has_child_named(&self, name: &str) -> bool {
        self.docs.iter().any(|d| d.name == name)
            || self.file_refs.iter().any(|f| f.name == name)
            || self.folders.iter().any(|f| f.name == name)
    }

    /// Find a direct child folder by name.
    pub fn child_folder(&self, name: &str, exact_case: bool) -> Option<&Folder> {
        self.folders.iter().find(|f| {
            if exact_case {
                f.name == name
            } else {
                f.name.eq_ignore_ascii_case(name)
            }
        })
    }

    /// Resolve a positional path to the folder it addresses.
    ///
    /// `None` when the path has a non-folder step or an index out of range.
    pub fn folder_at(&self, path: &MongoPath) -> Option<&Folder> {
        let mut current = self;
        for step in path.steps() {
            if step.kind != EntityKind::Folder {
                return None;
            }
            current = current.folders.get(step.index)?;
        }
        Some(current)
    }

    /// Mutable variant of [`Self::folder_at`].
    pub fn folder_at_mut(&mut self, path: &MongoPath) -> Option<&mut Folder> {
        let mut current = self;
        for step in path.steps() {
            if step.kind != EntityKind::Folder {
                return None;
            }
            current = current.folders.get_mut(step.index)?;
        }
        Some(current)
    }

    /// Resolve a positional path to a clone of the node it addresses.
    ///
    /// Used to re-read a just-written value from a returned snapshot.
    pub fn entity_at(&self, path: &MongoPath) -> Option<TreeEntity> {
        let Some((parent_path, last)) = path.split_last() else {
            return Some(TreeEntity::Folder(self.clone()));
        };
        let parent = self.folder_at(&parent_path)?;
        match last.kind {
            EntityKind::Doc => parent.docs.get(last.index).cloned().map(TreeEntity::Doc),
            EntityKind::File => parent
                .file_refs
                .get(last.index)
                .cloned()
                .map(TreeEntity::File),
            EntityKind::Folder => parent
                .folders
                .get(last.index)
                .cloned()
                .map(TreeEntity::Folder),
        }
    }

    /// Append an entity to the addressed folder's typed array, returning the
    /// new element's positional path.
    ///
    /// Appending never shifts existing indices, which is what makes the
    /// move operation's insert-then-remove ordering safe.
    pub fn insert_at(&mut self, folder_path: &MongoPath, entity: TreeEntity) -> Option<MongoPath> {
        let folder = self.folder_at_mut(folder_path)?;
        let step = match entity {
            TreeEntity::Doc(doc) => {
                folder.docs.push(doc);
                PathStep {
                    kind: EntityKind::Doc,
                    index: folder.docs.len() - 1,
                }
            }
            TreeEntity::File(file) => {
                folder.file_refs.push(file);
                PathStep {
                    kind: EntityKind::File,
                    index: folder.file_refs.len() - 1,
                }
            }
            TreeEntity::Folder(sub) => {
                folder.folders.push(sub);
                PathStep {
                    kind: EntityKind::Folder,
                    index: folder.folders.len() - 1,
                }
            }
        };
        Some(folder_path.clone().child(step.kind, step.index))
    }

    /// Remove the entity with `id` from the typed array addressed by
    /// `entity_path`'s parent, returning the removed subtree.
    ///
    /// Removal matches by id, not by index, mirroring the positional-pull
    /// semantics of the stored-document update.
    pub fn remove_at(&mut self, entity_path: &MongoPath, id: EntityId) -> Option<TreeEntity> {
        let (parent_path, last) = entity_path.split_last()?;
        let parent = self.folder_at_mut(&parent_path)?;
        match last.kind {
            EntityKind::Doc => {
                let pos = parent.docs.iter().position(|d| d.id == id)?;
                Some(TreeEntity::Doc(parent.docs.remove(pos)))
            }
            EntityKind::File => {
                let pos = parent.file_refs.iter().position(|f| f.id == id)?;
                Some(TreeEntity::File(parent.file_refs.remove(pos)))
            }
            EntityKind::Folder => {
                let pos = parent.folders.iter().position(|f| f.id == id)?;
                Some(TreeEntity::Folder(parent.folders.remove(pos)))
            }
        }
    }

    /// Set the name of the node addressed by `entity_path`.
    pub fn rename_at(&mut self, entity_path: &MongoPath, new_name: &str) -> bool {
        let Some((parent_path, last)) = entity_path.split_last() else {
            return false;
        };
        let Some(parent) = self.folder_at_mut(&parent_path) else {
            return false;
        };
        match last.kind {
            EntityKind::Doc => match parent.docs.get_mut(last.index) {
                Some(doc) => {
                    doc.name = new_name.to_string();
                    true
                }
                None => false,
            },
            EntityKind::File => match parent.file_refs.get_mut(last.index) {
                Some(file) => {
                    file.name = new_name.to_string();
                    true
                }
                None => false,
            },
            EntityKind::Folder => match parent.folders.get_mut(last.index) {
                Some(folder) => {
                    folder.name = new_name.to_string();
                    true
                }
                None => false,
            },
        }
    }

    /// Overwrite the identity and content fields of the file at
    /// `entity_path` in place, bumping its revision. The name stays.
    pub fn replace_file_at(&mut self, entity_path: &MongoPath, new_file: &FileRef) -> bool {
        let Some((parent_path, last)) = entity_path.split_last() else {
            return false;
        };
        if last.kind != EntityKind::File {
            return false;
        }
        let Some(parent) = self.folder_at_mut(&parent_path) else {
            return false;
        };
        match parent.file_refs.get_mut(last.index) {
            Some(file) => {
                file.id = new_file.id;
                file.hash = new_file.hash.clone();
                file.linked_file_data = new_file.linked_file_data.clone();
                file.created = new_file.created;
                file.rev += 1;
                true
            }
            None => false,
        }
    }
}
