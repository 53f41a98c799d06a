//! Forwards committed structure changes to downstream consumers.
//!
//! The content-sync engine is authoritative about ordering: its calls for
//! one project must arrive in commit order, which holds because every call
//! here is issued from inside the same locked operation that committed the
//! write. The third-party mirror is best-effort; its failures are logged
//! and never fail the primary mutation.

use std::sync::Arc;

use tracing::warn;

use dochub_core::events::structure::StructureChanges;
use dochub_core::result::AppResult;
use dochub_core::traits::content_sync::ContentSyncClient;
use dochub_core::traits::tpds::TpdsClient;
use dochub_core::types::UserId;
use dochub_entity::TreeEntity;
use dochub_entity::folder::Folder;
use dochub_entity::project::Project;

use super::locator;

/// Builds structure deltas and delivers them downstream.
pub struct StructureChangeNotifier {
    content_sync: Arc<dyn ContentSyncClient>,
    tpds: Arc<dyn TpdsClient>,
}

impl StructureChangeNotifier {
    /// Creates a new notifier.
    pub fn new(content_sync: Arc<dyn ContentSyncClient>, tpds: Arc<dyn TpdsClient>) -> Self {
        Self { content_sync, tpds }
    }

    /// Diff the leaf-entity sets of two tree snapshots.
    pub fn build_changes(old: &Folder, new: &Folder, new_version: i64) -> StructureChanges {
        let (old_docs, old_files) = locator::collect_leaf_entries(old);
        let (new_docs, new_files) = locator::collect_leaf_entries(new);
        StructureChanges {
            old_docs,
            new_docs,
            old_files,
            new_files,
            new_version,
        }
    }

    /// Send a structure delta to the content-sync engine.
    ///
    /// A failure here is surfaced to the caller: the committed write is not
    /// rolled back, and the two sides stay diverged until a resync.
    pub async fn send_structure_update(
        &self,
        project: &Project,
        user_id: UserId,
        changes: &StructureChanges,
    ) -> AppResult<()> {
        if changes.is_empty() {
            return Ok(());
        }
        self.content_sync
            .update_project_structure(project.id, project.history_id.as_deref(), user_id, changes)
            .await
    }

    /// Push the project's complete doc/file path sets to the content-sync
    /// engine so it can rebuild its state from scratch.
    pub async fn send_full_resync(&self, project: &Project) -> AppResult<()> {
        let (docs, files) = locator::collect_leaf_entries(&project.root_folder);
        self.content_sync
            .resync_project_structure(project.id, project.history_id.as_deref(), &docs, &files)
            .await
    }

    /// Mirror a newly added doc or file. Folders are not mirrored
    /// individually; their contained leaves are.
    pub async fn mirror_added_entity(&self, project: &Project, entity: &TreeEntity, path: &str) {
        let result = match entity {
            TreeEntity::Doc(doc) => {
                self.tpds
                    .add_doc(project.id, &project.name, doc.id, path, doc.rev)
                    .await
            }
            TreeEntity::File(file) => {
                self.tpds
                    .add_file(project.id, &project.name, file.id, path, file.rev)
                    .await
            }
            TreeEntity::Folder(_) => return,
        };
        if let Err(err) = result {
            warn!(
                project_id = %project.id,
                path,
                error = %err,
                "Third-party mirror add failed"
            );
        }
    }

    /// Mirror a move or rename as a path change.
    pub async fn mirror_moved_entity(
        &self,
        project: &Project,
        start_path: &str,
        end_path: &str,
        rev: i64,
    ) {
        if let Err(err) = self
            .tpds
            .move_entity(project.id, &project.name, start_path, end_path, rev)
            .await
        {
            warn!(
                project_id = %project.id,
                start_path,
                end_path,
                error = %err,
                "Third-party mirror move failed"
            );
        }
    }

    /// Mirror a deletion.
    pub async fn mirror_deleted_entity(&self, project: &Project, path: &str) {
        if let Err(err) = self.tpds.delete_entity(project.id, &project.name, path).await {
            warn!(
                project_id = %project.id,
                path,
                error = %err,
                "Third-party mirror delete failed"
            );
        }
    }
}
