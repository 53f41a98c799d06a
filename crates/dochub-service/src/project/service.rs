//! Project-level operations: creation, history wiring, root doc, file
//! flows touching external content stores, and the resync recovery path.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use dochub_core::error::AppError;
use dochub_core::events::structure::EntityKind;
use dochub_core::result::AppResult;
use dochub_core::traits::docstore::DocstoreClient;
use dochub_core::traits::filestore::FileStoreClient;
use dochub_core::traits::history::HistoryClient;
use dochub_core::traits::lock::{LockProvider, run_with_lock};
use dochub_core::types::{EntityId, ProjectId};
use dochub_database::{ProjectStore, TreeSelection};
use dochub_entity::TreeEntity;
use dochub_entity::doc::Doc;
use dochub_entity::file::FileRef;
use dochub_entity::project::Project;

use crate::context::RequestContext;
use crate::filetree::mutator::{LOCK_NAMESPACE, MutationOutcome, TreeMutator};
use crate::filetree::{StructureChangeNotifier, locator};

/// Extensions a doc must carry to serve as a project's compilation entry
/// point.
const ROOT_DOC_EXTENSIONS: &[&str] = &[".tex", ".rtex", ".ltex"];

fn is_root_doc_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ROOT_DOC_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Manages project lifecycle around the tree.
pub struct ProjectService {
    store: Arc<dyn ProjectStore>,
    locks: Arc<dyn LockProvider>,
    notifier: Arc<StructureChangeNotifier>,
    mutator: Arc<TreeMutator>,
    history: Arc<dyn HistoryClient>,
    docstore: Arc<dyn DocstoreClient>,
    filestore: Arc<dyn FileStoreClient>,
}

impl ProjectService {
    /// Creates a new project service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn ProjectStore>,
        locks: Arc<dyn LockProvider>,
        notifier: Arc<StructureChangeNotifier>,
        mutator: Arc<TreeMutator>,
        history: Arc<dyn HistoryClient>,
        docstore: Arc<dyn DocstoreClient>,
        filestore: Arc<dyn FileStoreClient>,
    ) -> Self {
        Self {
            store,
            locks,
            notifier,
            mutator,
            history,
            docstore,
            filestore,
        }
    }

    /// Create a project with an empty root folder, registered with the
    /// history service.
    pub async fn create_project(&self, ctx: &RequestContext, name: &str) -> AppResult<Project> {
        if name.trim().is_empty() {
            return Err(AppError::invalid_name("project name cannot be empty"));
        }
        let mut project = Project::new(name, ctx.user_id);
        let history_id = self.history.initialize_project(project.id).await?;
        project.history_id = Some(history_id);
        let created = self.store.create(&project).await?;
        info!(
            project_id = %created.id,
            owner_id = %ctx.user_id,
            name = %created.name,
            "Project created"
        );
        Ok(created)
    }

    /// Return the project's history id, registering with the history
    /// service first when none is set.
    ///
    /// The id is written at most once; a concurrent initializer losing the
    /// set-if-unset race falls back to the winner's value.
    pub async fn ensure_history_id(&self, project_id: ProjectId) -> AppResult<String> {
        let project = self.load_project(project_id, TreeSelection::FoldersOnly).await?;
        if let Some(history_id) = project.history_id {
            return Ok(history_id);
        }
        let history_id = self.history.initialize_project(project_id).await?;
        if self.store.set_history_id(project_id, &history_id).await? {
            info!(project_id = %project_id, history_id = %history_id, "History initialized");
            return Ok(history_id);
        }
        // Lost the race; someone else set it first.
        self.load_project(project_id, TreeSelection::FoldersOnly)
            .await?
            .history_id
            .ok_or_else(|| {
                AppError::consistency_violation(format!(
                    "history id for project {project_id} set concurrently but absent on reload"
                ))
            })
    }

    /// Point the project at a new compilation entry point.
    ///
    /// The doc must exist in the tree and carry a root-doc-capable
    /// extension.
    pub async fn set_root_doc(&self, project_id: ProjectId, doc_id: EntityId) -> AppResult<()> {
        let project = self.load_project(project_id, TreeSelection::Full).await?;
        let found = locator::find_by_id(&project.root_folder, doc_id, Some(EntityKind::Doc))
            .ok_or_else(|| AppError::not_found(format!("doc {doc_id} not found")))?;
        if !is_root_doc_name(found.entity.name()) {
            return Err(AppError::invalid_name(format!(
                "'{}' cannot be a root doc",
                found.entity.name()
            )));
        }
        self.store.set_root_doc(project_id, Some(doc_id)).await
    }

    /// Clear the project's compilation entry point.
    pub async fn unset_root_doc(&self, project_id: ProjectId) -> AppResult<()> {
        self.store.set_root_doc(project_id, None).await
    }

    /// Add a doc with its content: persist the lines to the docstore, then
    /// insert the doc into the tree.
    ///
    /// Content is written first so a failure between the two steps leaves
    /// an orphaned doc in the docstore rather than a tree entry without
    /// content.
    pub async fn add_doc(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        folder_id: Option<EntityId>,
        name: &str,
        lines: &[String],
    ) -> AppResult<MutationOutcome> {
        let doc = Doc::new(name);
        let update = self
            .docstore
            .update_doc(project_id, doc.id, lines, doc.rev)
            .await?;
        info!(
            project_id = %project_id,
            doc_id = %doc.id,
            rev = update.rev,
            "Doc content stored"
        );
        self.mutator
            .insert_entity(ctx, project_id, folder_id, TreeEntity::Doc(doc))
            .await
    }

    /// Upload a file's content from local disk and insert it into the tree.
    pub async fn add_uploaded_file(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        folder_id: Option<EntityId>,
        name: &str,
        source: &Path,
    ) -> AppResult<MutationOutcome> {
        let file = FileRef::new(name, None);
        let url = self
            .filestore
            .upload_from_disk(project_id, file.id, source)
            .await?;
        info!(project_id = %project_id, file_id = %file.id, url = %url, "File content uploaded");
        self.mutator
            .insert_entity(ctx, project_id, folder_id, TreeEntity::File(file))
            .await
    }

    /// Copy a file's stored blob from another project and insert the copy
    /// into this project's tree.
    pub async fn copy_file_from_project(
        &self,
        ctx: &RequestContext,
        src_project_id: ProjectId,
        src_file_id: EntityId,
        dest_project_id: ProjectId,
        dest_folder_id: Option<EntityId>,
        name: &str,
    ) -> AppResult<MutationOutcome> {
        let src_project = self.load_project(src_project_id, TreeSelection::Full).await?;
        let source =
            locator::find_by_id(&src_project.root_folder, src_file_id, Some(EntityKind::File))
                .ok_or_else(|| AppError::not_found(format!("file {src_file_id} not found")))?;
        let TreeEntity::File(src_file) = source.entity else {
            return Err(AppError::not_found(format!("file {src_file_id} not found")));
        };

        let mut copy = FileRef::new(name, src_file.hash.clone());
        copy.linked_file_data = src_file.linked_file_data.clone();
        let url = self
            .filestore
            .copy_file(src_project_id, src_file_id, dest_project_id, copy.id)
            .await?;
        info!(
            src_project_id = %src_project_id,
            dest_project_id = %dest_project_id,
            file_id = %copy.id,
            url = %url,
            "File blob copied"
        );
        self.mutator
            .insert_entity(ctx, dest_project_id, dest_folder_id, TreeEntity::File(copy))
            .await
    }

    /// Push the project's complete structure to the content-sync engine.
    ///
    /// Takes the per-project lock so the resync orders behind any in-flight
    /// structural mutation; this is the recovery path after a notification
    /// failure left the two sides diverged.
    pub async fn resync_project_history(&self, project_id: ProjectId) -> AppResult<()> {
        self.ensure_history_id(project_id).await?;
        run_with_lock(
            self.locks.as_ref(),
            LOCK_NAMESPACE,
            &project_id.to_string(),
            || async {
                let project = self.load_project(project_id, TreeSelection::Full).await?;
                self.notifier.send_full_resync(&project).await?;
                self.history.flush_project(project_id).await
            },
        )
        .await?;
        info!(project_id = %project_id, "Project structure resynced");
        Ok(())
    }

    /// Hard-delete a project: drop its row and destroy its doc content.
    pub async fn delete_project(&self, project_id: ProjectId) -> AppResult<bool> {
        let deleted = run_with_lock(
            self.locks.as_ref(),
            LOCK_NAMESPACE,
            &project_id.to_string(),
            || self.store.delete(project_id),
        )
        .await?;
        if deleted {
            self.docstore.destroy_project(project_id).await?;
            info!(project_id = %project_id, "Project destroyed");
        }
        Ok(deleted)
    }

    async fn load_project(
        &self,
        project_id: ProjectId,
        selection: TreeSelection,
    ) -> AppResult<Project> {
        self.store
            .find_by_id(project_id, selection)
            .await?
            .ok_or_else(|| AppError::not_found(format!("project {project_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_doc_extensions() {
        assert!(is_root_doc_name("main.tex"));
        assert!(is_root_doc_name("MAIN.TEX"));
        assert!(is_root_doc_name("paper.rtex"));
        assert!(is_root_doc_name("paper.ltex"));
        assert!(!is_root_doc_name("notes.md"));
        assert!(!is_root_doc_name("tex"));
    }
}
