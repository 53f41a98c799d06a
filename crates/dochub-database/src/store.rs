//! The project store contract shared by the PostgreSQL and in-memory
//! backends.

use async_trait::async_trait;

use dochub_core::result::AppResult;
use dochub_core::types::{EntityId, ProjectId};
use dochub_entity::file::FileRef;
use dochub_entity::folder::Folder;
use dochub_entity::path::MongoPath;
use dochub_entity::project::{DeletedDoc, DeletedFile, Project};
use dochub_entity::TreeEntity;

/// How much of the tree a load should materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeSelection {
    /// The complete tree.
    Full,
    /// Folders only; doc and file arrays come back empty. Cheap prefix
    /// walks (mkdirp) use this.
    FoldersOnly,
}

impl TreeSelection {
    /// Apply the selection to a loaded project.
    pub fn apply(self, project: &mut Project) {
        if self == Self::FoldersOnly {
            strip_leaves(&mut project.root_folder);
        }
    }
}

fn strip_leaves(folder: &mut Folder) {
    folder.docs.clear();
    folder.file_refs.clear();
    for child in &mut folder.folders {
        strip_leaves(child);
    }
}

/// Storage backend for project tree documents.
///
/// Mutating methods return the full post-mutation project (the storage
/// engine's returned document), so callers can re-read just-written values
/// via positional paths without a second round trip. A mutation whose
/// existence guard matches nothing fails with `NotFound` (except
/// [`Self::replace_root_folder`], whose guard failure is
/// `AlreadyPopulated`) and has no effect.
#[async_trait]
pub trait ProjectStore: Send + Sync + 'static {
    /// Insert a new project row.
    async fn create(&self, project: &Project) -> AppResult<Project>;

    /// Load a project, or `None` when it does not exist.
    async fn find_by_id(
        &self,
        id: ProjectId,
        selection: TreeSelection,
    ) -> AppResult<Option<Project>>;

    /// Set the history id, only when not already set. Returns whether the
    /// value was written.
    async fn set_history_id(&self, id: ProjectId, history_id: &str) -> AppResult<bool>;

    /// Point the project at a new root doc (or clear it).
    async fn set_root_doc(&self, id: ProjectId, doc_id: Option<EntityId>) -> AppResult<()>;

    /// Append `entity` to the typed child array of the folder at
    /// `folder_path`, guarded on the folder still existing.
    async fn push_entity(
        &self,
        id: ProjectId,
        folder_path: &MongoPath,
        entity: &TreeEntity,
    ) -> AppResult<Project>;

    /// Remove the entity with `entity_id` from the array addressed by
    /// `entity_path`, guarded on the path still resolving. Unsets the
    /// project's root doc in the same update when it is the removed entity.
    async fn pull_entity(
        &self,
        id: ProjectId,
        entity_path: &MongoPath,
        entity_id: EntityId,
    ) -> AppResult<Project>;

    /// Overwrite only the `name` field at `entity_path`.
    async fn rename_entity_at(
        &self,
        id: ProjectId,
        entity_path: &MongoPath,
        new_name: &str,
    ) -> AppResult<Project>;

    /// Overwrite the identity/content fields of the file at `file_path` in
    /// place and bump its revision counter.
    async fn replace_file_at(
        &self,
        id: ProjectId,
        file_path: &MongoPath,
        new_file: &FileRef,
    ) -> AppResult<Project>;

    /// Replace the entire root folder, guarded on the current root being
    /// structurally empty. Fails with `AlreadyPopulated` otherwise.
    async fn replace_root_folder(&self, id: ProjectId, root: &Folder) -> AppResult<Project>;

    /// Record a doc removed from the tree for later garbage collection.
    async fn record_deleted_doc(&self, id: ProjectId, doc: &DeletedDoc) -> AppResult<()>;

    /// Record a file removed from the tree for later garbage collection.
    async fn record_deleted_file(&self, id: ProjectId, file: &DeletedFile) -> AppResult<()>;

    /// Hard-delete a project and its tree. Returns `true` if a row went.
    async fn delete(&self, id: ProjectId) -> AppResult<bool>;
}
