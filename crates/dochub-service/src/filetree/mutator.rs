//! Structural mutations of a project's tree.
//!
//! Every public operation runs under the per-project lock and has the same
//! three-phase shape: resolve the affected nodes from a fresh snapshot,
//! validate, then issue one conditional positional write. Positional paths
//! never survive across operations; a failed existence guard means the
//! snapshot went stale and the caller must start over from resolution.
//!
//! The `*_without_lock` variants exist for nested steps of an operation
//! that already holds the lock; calling the locked variant from inside one
//! would deadlock.

use std::sync::Arc;

use tracing::{error, info, warn};

use dochub_core::config::limits::LimitsConfig;
use dochub_core::error::AppError;
use dochub_core::events::structure::{EntityKind, StructureChanges};
use dochub_core::result::AppResult;
use dochub_core::traits::cooldown::CooldownSignal;
use dochub_core::traits::lock::{LockProvider, run_with_lock};
use dochub_core::types::{EntityId, ProjectId};
use dochub_database::{ProjectStore, TreeSelection};
use dochub_entity::TreeEntity;
use dochub_entity::folder::Folder;
use dochub_entity::path::{MongoPath, TreePath};
use dochub_entity::project::{DeletedDoc, DeletedFile, Project};

use crate::context::RequestContext;

use super::builder::{self, DocEntry, FileEntry};
use super::locator::{self, FoundEntity};
use super::notifier::StructureChangeNotifier;
use super::safe_path;

/// Lock namespace under which all structural mutations serialize.
pub const LOCK_NAMESPACE: &str = "project-structure";

/// Result of a single-entity mutation: the affected entity, its path in
/// the post-mutation tree, and the post-mutation project.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// The inserted, replaced, or removed entity.
    pub entity: TreeEntity,
    /// Its resolved path (for deletions: the path it was removed from).
    pub path: TreePath,
    /// The project as returned by the committed write.
    pub project: Project,
}

/// A folder created by `mkdirp`, with its resolved path.
#[derive(Debug, Clone)]
pub struct CreatedFolder {
    /// The created folder.
    pub folder: Folder,
    /// Its path in the tree that contained the final creation.
    pub path: TreePath,
}

/// Result of `mkdirp`: the deepest folder plus everything newly created.
///
/// Callers replicate `new_folders` downstream separately; folders do not
/// appear in structure deltas.
#[derive(Debug, Clone)]
pub struct MkdirpResult {
    /// The folder at the full requested path.
    pub folder: Folder,
    /// Its resolved path.
    pub path: TreePath,
    /// Folders that did not exist before this call, shallowest first.
    pub new_folders: Vec<CreatedFolder>,
}

/// Result of a move or rename.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// The entity's filesystem path before the mutation.
    pub start_path: String,
    /// The entity's filesystem path after the mutation.
    pub end_path: String,
    /// The entity's revision counter.
    pub rev: i64,
    /// The leaf-entity delta the mutation produced.
    pub changes: StructureChanges,
}

/// Executes structural mutations against the project store.
pub struct TreeMutator {
    store: Arc<dyn ProjectStore>,
    locks: Arc<dyn LockProvider>,
    notifier: Arc<StructureChangeNotifier>,
    cooldown: Arc<dyn CooldownSignal>,
    limits: LimitsConfig,
}

impl TreeMutator {
    /// Creates a new tree mutator.
    pub fn new(
        store: Arc<dyn ProjectStore>,
        locks: Arc<dyn LockProvider>,
        notifier: Arc<StructureChangeNotifier>,
        cooldown: Arc<dyn CooldownSignal>,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            store,
            locks,
            notifier,
            cooldown,
            limits,
        }
    }

    /// Insert a doc, file, or folder into a parent folder (root when
    /// `parent_folder_id` is `None`).
    pub async fn insert_entity(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        parent_folder_id: Option<EntityId>,
        entity: TreeEntity,
    ) -> AppResult<MutationOutcome> {
        run_with_lock(
            self.locks.as_ref(),
            LOCK_NAMESPACE,
            &project_id.to_string(),
            || self.insert_entity_without_lock(ctx, project_id, parent_folder_id, entity),
        )
        .await
    }

    /// [`Self::insert_entity`] for callers already holding the lock.
    pub async fn insert_entity_without_lock(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        parent_folder_id: Option<EntityId>,
        entity: TreeEntity,
    ) -> AppResult<MutationOutcome> {
        let project = self.load_project(project_id, TreeSelection::Full).await?;
        let parent = self.resolve_folder(&project, parent_folder_id)?;
        let parent_folder = self.folder_at(&project, &parent.path.mongo)?;

        self.validate_new_name(
            parent_folder,
            &parent.path.file_system,
            entity.name(),
            entity.kind(),
        )?;
        self.check_entity_ceiling(project_id, project.count_entities() + 1)
            .await?;

        let entity_id = entity.id();
        let kind = entity.kind();
        let updated = self
            .store
            .push_entity(project_id, &parent.path.mongo, &entity)
            .await?;
        let placed = locator::find_by_id(&updated.root_folder, entity_id, Some(kind))
            .ok_or_else(|| {
                AppError::consistency_violation(format!(
                    "inserted {kind} {entity_id} missing from returned document"
                ))
            })?;

        info!(
            project_id = %project_id,
            entity_id = %entity_id,
            kind = %kind,
            path = %placed.path.file_system,
            "Entity inserted"
        );

        let changes = StructureChangeNotifier::build_changes(
            &project.root_folder,
            &updated.root_folder,
            updated.version,
        );
        self.notifier
            .send_structure_update(&updated, ctx.user_id, &changes)
            .await?;
        self.notifier
            .mirror_added_entity(&updated, &placed.entity, &placed.path.file_system)
            .await;

        Ok(MutationOutcome {
            entity: placed.entity,
            path: placed.path,
            project: updated,
        })
    }

    /// Ensure every folder along `path` exists, creating missing ones.
    ///
    /// Existing folders match case-insensitively unless `exact_case_match`.
    pub async fn mkdirp(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        path: &str,
        exact_case_match: bool,
    ) -> AppResult<MkdirpResult> {
        run_with_lock(
            self.locks.as_ref(),
            LOCK_NAMESPACE,
            &project_id.to_string(),
            || self.mkdirp_without_lock(ctx, project_id, path, exact_case_match),
        )
        .await
    }

    /// [`Self::mkdirp`] for callers already holding the lock.
    pub async fn mkdirp_without_lock(
        &self,
        _ctx: &RequestContext,
        project_id: ProjectId,
        path: &str,
        exact_case_match: bool,
    ) -> AppResult<MkdirpResult> {
        let stripped = path.trim_matches('/');
        if stripped.is_empty() {
            // The root always exists.
            let project = self.load_project(project_id, TreeSelection::Full).await?;
            return Ok(MkdirpResult {
                folder: project.root_folder,
                path: TreePath::root(),
                new_folders: Vec::new(),
            });
        }
        // Segments are validated individually; the blocked-name rule does
        // not apply to folders, so a whole-path cleanliness check would
        // wrongly reject a top-level folder named after a reserved word.
        if !safe_path::is_allowed_length(&format!("/{stripped}"))
            || stripped.split('/').any(|s| !safe_path::is_clean_name(s))
        {
            return Err(AppError::invalid_name(format!("invalid folder path: {path}")));
        }

        let mut project = self.load_project(project_id, TreeSelection::Full).await?;
        let mut mongo = MongoPath::root();
        let mut fs = String::new();
        let mut new_folders = Vec::new();

        for segment in stripped.split('/') {
            let current = self.folder_at(&project, &mongo)?;
            let existing = current.folders.iter().position(|f| {
                if exact_case_match {
                    f.name == segment
                } else {
                    f.name.eq_ignore_ascii_case(segment)
                }
            });
            match existing {
                Some(i) => {
                    fs = format!("{fs}/{}", current.folders[i].name);
                    mongo = mongo.child(EntityKind::Folder, i);
                }
                None => {
                    self.validate_new_name(current, &fs, segment, EntityKind::Folder)?;
                    self.check_entity_ceiling(project_id, project.count_entities() + 1)
                        .await?;
                    project = self
                        .store
                        .push_entity(
                            project_id,
                            &mongo,
                            &TreeEntity::Folder(Folder::new(segment)),
                        )
                        .await?;
                    let parent = self.folder_at(&project, &mongo)?;
                    let i = parent.folders.len() - 1;
                    let created = parent.folders[i].clone();
                    fs = format!("{fs}/{}", created.name);
                    mongo = mongo.child(EntityKind::Folder, i);
                    info!(
                        project_id = %project_id,
                        folder_id = %created.id,
                        path = %fs,
                        "Folder created"
                    );
                    new_folders.push(CreatedFolder {
                        folder: created,
                        path: TreePath {
                            file_system: fs.clone(),
                            mongo: mongo.clone(),
                        },
                    });
                }
            }
        }

        let folder = self.folder_at(&project, &mongo)?.clone();
        Ok(MkdirpResult {
            folder,
            path: TreePath {
                file_system: fs,
                mongo,
            },
            new_folders,
        })
    }

    /// Replace a leaf with a new one at the same position.
    ///
    /// A file replaced by a file is overwritten in place, keeping its name
    /// and position and bumping its revision. A doc replaced by a file (or
    /// the reverse) moves between the typed arrays: the new leaf is
    /// inserted under the old leaf's name first, then the old one is
    /// pulled. The old leaf is recorded as deleted either way so its
    /// external content can be garbage collected.
    pub async fn replace_leaf_with_new(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        leaf_id: EntityId,
        new_leaf: TreeEntity,
    ) -> AppResult<MutationOutcome> {
        run_with_lock(
            self.locks.as_ref(),
            LOCK_NAMESPACE,
            &project_id.to_string(),
            || self.replace_leaf_without_lock(ctx, project_id, leaf_id, new_leaf),
        )
        .await
    }

    /// [`Self::replace_leaf_with_new`] for callers already holding the lock.
    pub async fn replace_leaf_without_lock(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        leaf_id: EntityId,
        new_leaf: TreeEntity,
    ) -> AppResult<MutationOutcome> {
        if matches!(new_leaf, TreeEntity::Folder(_)) {
            return Err(AppError::internal("replacement entity must be a leaf"));
        }
        let project = self.load_project(project_id, TreeSelection::Full).await?;
        let found = locator::find_by_id(&project.root_folder, leaf_id, None)
            .filter(|f| f.entity.kind() != EntityKind::Folder)
            .ok_or_else(|| AppError::not_found(format!("leaf {leaf_id} not found")))?;
        let parent_path = found
            .parent_path
            .clone()
            .ok_or_else(|| AppError::internal("leaf entity without a parent"))?;

        let (updated, new_id) = match (&found.entity, &new_leaf) {
            (TreeEntity::File(_), TreeEntity::File(new_file)) => {
                let updated = self
                    .store
                    .replace_file_at(project_id, &found.path.mongo, new_file)
                    .await?;
                (updated, new_file.id)
            }
            _ => {
                let replacement = with_name(new_leaf.clone(), found.entity.name());
                let new_id = replacement.id();
                self.store
                    .push_entity(project_id, &parent_path, &replacement)
                    .await?;
                let updated = self
                    .store
                    .pull_entity(project_id, &found.path.mongo, leaf_id)
                    .await?;
                (updated, new_id)
            }
        };
        self.record_deleted_leaf(project_id, &found.entity).await?;

        let placed = locator::find_by_id(&updated.root_folder, new_id, None).ok_or_else(|| {
            AppError::consistency_violation(format!(
                "replacement leaf {new_id} missing from returned document"
            ))
        })?;

        info!(
            project_id = %project_id,
            old_id = %leaf_id,
            new_id = %new_id,
            path = %placed.path.file_system,
            "Leaf replaced"
        );

        let changes = StructureChangeNotifier::build_changes(
            &project.root_folder,
            &updated.root_folder,
            updated.version,
        );
        self.notifier
            .send_structure_update(&updated, ctx.user_id, &changes)
            .await?;
        self.notifier
            .mirror_added_entity(&updated, &placed.entity, &placed.path.file_system)
            .await;

        Ok(MutationOutcome {
            entity: placed.entity,
            path: placed.path,
            project: updated,
        })
    }

    /// Move an entity into another folder (root when `dest_folder_id` is
    /// `None`).
    ///
    /// The entity is inserted at the destination first and pulled from its
    /// original position second. A crash between the two steps leaves a
    /// duplicate rather than a loss; the count check below turns a
    /// detected duplicate into a hard failure instead of repairing it.
    pub async fn move_entity(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        entity_id: EntityId,
        kind: EntityKind,
        dest_folder_id: Option<EntityId>,
    ) -> AppResult<MoveResult> {
        run_with_lock(
            self.locks.as_ref(),
            LOCK_NAMESPACE,
            &project_id.to_string(),
            || self.move_entity_without_lock(ctx, project_id, entity_id, kind, dest_folder_id),
        )
        .await
    }

    /// [`Self::move_entity`] for callers already holding the lock.
    pub async fn move_entity_without_lock(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        entity_id: EntityId,
        kind: EntityKind,
        dest_folder_id: Option<EntityId>,
    ) -> AppResult<MoveResult> {
        let project = self.load_project(project_id, TreeSelection::Full).await?;
        let source = locator::find_by_id(&project.root_folder, entity_id, Some(kind))
            .ok_or_else(|| AppError::not_found(format!("{kind} {entity_id} not found")))?;
        if source.parent_path.is_none() {
            return Err(AppError::invalid_move("the root folder cannot be moved"));
        }
        let dest = self.resolve_folder(&project, dest_folder_id)?;
        let dest_folder = self.folder_at(&project, &dest.path.mongo)?;

        if kind == EntityKind::Folder {
            let source_fs = &source.path.file_system;
            if dest.entity.id() == entity_id
                || dest.path.file_system == *source_fs
                || dest
                    .path
                    .file_system
                    .starts_with(&format!("{source_fs}/"))
            {
                return Err(AppError::invalid_move(format!(
                    "cannot move {source_fs} into itself or a descendant"
                )));
            }
        }
        let name = source.entity.name();
        if dest.path.file_system.is_empty()
            && kind != EntityKind::Folder
            && safe_path::is_blocked_name(name)
        {
            return Err(AppError::invalid_name(format!(
                "'{name}' is a reserved name at the top level"
            )));
        }
        let end_fs = format!("{}/{name}", dest.path.file_system);
        if !safe_path::is_allowed_length(&end_fs) {
            return Err(AppError::invalid_name(format!("path too long: {end_fs}")));
        }
        if dest_folder.has_child_named(name) {
            return Err(AppError::duplicate_name(format!(
                "'{name}' already exists in the destination folder"
            )));
        }

        let (docs_before, files_before) = locator::collect_leaf_entries(&project.root_folder);

        self.store
            .push_entity(project_id, &dest.path.mongo, &source.entity)
            .await?;
        // Appends never shift sibling indices, so the source path computed
        // from the pre-insert snapshot is still valid here.
        let updated = self
            .store
            .pull_entity(project_id, &source.path.mongo, entity_id)
            .await?;

        let (docs_after, files_after) = locator::collect_leaf_entries(&updated.root_folder);
        if docs_after.len() != docs_before.len() || files_after.len() != files_before.len() {
            error!(
                project_id = %project_id,
                entity_id = %entity_id,
                docs_before = docs_before.len(),
                docs_after = docs_after.len(),
                files_before = files_before.len(),
                files_after = files_after.len(),
                "Entity counts changed across a move"
            );
            return Err(AppError::consistency_violation(format!(
                "entity counts changed while moving {entity_id}"
            )));
        }

        let placed = locator::find_by_id(&updated.root_folder, entity_id, Some(kind))
            .ok_or_else(|| {
                AppError::consistency_violation(format!(
                    "moved {kind} {entity_id} missing from returned document"
                ))
            })?;

        info!(
            project_id = %project_id,
            entity_id = %entity_id,
            start_path = %source.path.file_system,
            end_path = %placed.path.file_system,
            "Entity moved"
        );

        let changes = StructureChangeNotifier::build_changes(
            &project.root_folder,
            &updated.root_folder,
            updated.version,
        );
        self.notifier
            .send_structure_update(&updated, ctx.user_id, &changes)
            .await?;
        self.notifier
            .mirror_moved_entity(
                &updated,
                &source.path.file_system,
                &placed.path.file_system,
                source.entity.rev(),
            )
            .await;

        Ok(MoveResult {
            start_path: source.path.file_system,
            end_path: placed.path.file_system,
            rev: source.entity.rev(),
            changes,
        })
    }

    /// Rename an entity in place.
    pub async fn rename_entity(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        entity_id: EntityId,
        kind: EntityKind,
        new_name: &str,
    ) -> AppResult<MoveResult> {
        run_with_lock(
            self.locks.as_ref(),
            LOCK_NAMESPACE,
            &project_id.to_string(),
            || self.rename_entity_without_lock(ctx, project_id, entity_id, kind, new_name),
        )
        .await
    }

    /// [`Self::rename_entity`] for callers already holding the lock.
    pub async fn rename_entity_without_lock(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        entity_id: EntityId,
        kind: EntityKind,
        new_name: &str,
    ) -> AppResult<MoveResult> {
        let project = self.load_project(project_id, TreeSelection::Full).await?;
        let found = locator::find_by_id(&project.root_folder, entity_id, Some(kind))
            .ok_or_else(|| AppError::not_found(format!("{kind} {entity_id} not found")))?;
        let Some(parent_path) = &found.parent_path else {
            return Err(AppError::invalid_name("the root folder cannot be renamed"));
        };
        let parent = self.folder_at(&project, parent_path)?;
        let parent_fs = found
            .path
            .file_system
            .rfind('/')
            .map(|i| &found.path.file_system[..i])
            .unwrap_or("");

        self.validate_new_name(parent, parent_fs, new_name, kind)?;

        let updated = self
            .store
            .rename_entity_at(project_id, &found.path.mongo, new_name)
            .await?;
        let end_path = format!("{parent_fs}/{new_name}");

        info!(
            project_id = %project_id,
            entity_id = %entity_id,
            start_path = %found.path.file_system,
            end_path = %end_path,
            "Entity renamed"
        );

        let changes = StructureChangeNotifier::build_changes(
            &project.root_folder,
            &updated.root_folder,
            updated.version,
        );
        self.notifier
            .send_structure_update(&updated, ctx.user_id, &changes)
            .await?;
        self.notifier
            .mirror_moved_entity(
                &updated,
                &found.path.file_system,
                &end_path,
                found.entity.rev(),
            )
            .await;

        Ok(MoveResult {
            start_path: found.path.file_system,
            end_path,
            rev: found.entity.rev(),
            changes,
        })
    }

    /// Delete an entity, returning the removed subtree.
    ///
    /// Removed docs and files (including those inside a removed folder) are
    /// recorded on the project for later garbage collection. Deleting the
    /// project's root doc unsets `root_doc_id` in the same write.
    pub async fn delete_entity(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        entity_id: EntityId,
        kind: EntityKind,
    ) -> AppResult<MutationOutcome> {
        run_with_lock(
            self.locks.as_ref(),
            LOCK_NAMESPACE,
            &project_id.to_string(),
            || self.delete_entity_without_lock(ctx, project_id, entity_id, kind),
        )
        .await
    }

    /// [`Self::delete_entity`] for callers already holding the lock.
    pub async fn delete_entity_without_lock(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        entity_id: EntityId,
        kind: EntityKind,
    ) -> AppResult<MutationOutcome> {
        let project = self.load_project(project_id, TreeSelection::Full).await?;
        if project.root_folder.id == entity_id {
            return Err(AppError::non_deletable("the root folder cannot be deleted"));
        }
        let found = locator::find_by_id(&project.root_folder, entity_id, Some(kind))
            .ok_or_else(|| AppError::not_found(format!("{kind} {entity_id} not found")))?;

        let updated = self
            .store
            .pull_entity(project_id, &found.path.mongo, entity_id)
            .await?;
        self.record_deleted_leaf(project_id, &found.entity).await?;

        info!(
            project_id = %project_id,
            entity_id = %entity_id,
            kind = %kind,
            path = %found.path.file_system,
            "Entity deleted"
        );

        let changes = StructureChangeNotifier::build_changes(
            &project.root_folder,
            &updated.root_folder,
            updated.version,
        );
        self.notifier
            .send_structure_update(&updated, ctx.user_id, &changes)
            .await?;
        self.notifier
            .mirror_deleted_entity(&updated, &found.path.file_system)
            .await;

        Ok(MutationOutcome {
            entity: found.entity,
            path: found.path,
            project: updated,
        })
    }

    /// Build a tree from flat entry lists and install it as the project's
    /// root folder.
    ///
    /// Only a structurally empty root is replaced; a populated project
    /// fails with `AlreadyPopulated` and is left untouched. Bulk
    /// installation skips per-entity mirroring and triggers a full
    /// content-sync resync instead.
    pub async fn create_new_folder_structure(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        doc_entries: Vec<DocEntry>,
        file_entries: Vec<FileEntry>,
    ) -> AppResult<Project> {
        run_with_lock(
            self.locks.as_ref(),
            LOCK_NAMESPACE,
            &project_id.to_string(),
            || self.create_new_folder_structure_without_lock(ctx, project_id, doc_entries, file_entries),
        )
        .await
    }

    /// [`Self::create_new_folder_structure`] for callers already holding
    /// the lock.
    pub async fn create_new_folder_structure_without_lock(
        &self,
        _ctx: &RequestContext,
        project_id: ProjectId,
        doc_entries: Vec<DocEntry>,
        file_entries: Vec<FileEntry>,
    ) -> AppResult<Project> {
        let root = builder::build_folder_structure(doc_entries, file_entries)?;
        self.check_entity_ceiling(project_id, root.count_entities())
            .await?;

        let updated = self.store.replace_root_folder(project_id, &root).await?;

        info!(
            project_id = %project_id,
            entities = updated.count_entities(),
            "Folder structure installed"
        );

        self.notifier.send_full_resync(&updated).await?;
        Ok(updated)
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

    fn resolve_folder(
        &self,
        project: &Project,
        folder_id: Option<EntityId>,
    ) -> AppResult<FoundEntity> {
        match folder_id {
            None => Ok(FoundEntity {
                entity: TreeEntity::Folder(project.root_folder.clone()),
                path: TreePath::root(),
                parent_path: None,
            }),
            Some(id) => {
                locator::find_by_id(&project.root_folder, id, Some(EntityKind::Folder))
                    .ok_or_else(|| AppError::not_found(format!("folder {id} not found")))
            }
        }
    }

    fn folder_at<'a>(&self, project: &'a Project, path: &MongoPath) -> AppResult<&'a Folder> {
        project.root_folder.folder_at(path).ok_or_else(|| {
            AppError::consistency_violation(format!("folder path {path} no longer resolves"))
        })
    }

    fn validate_new_name(
        &self,
        parent: &Folder,
        parent_fs: &str,
        name: &str,
        kind: EntityKind,
    ) -> AppResult<()> {
        if !safe_path::is_clean_name(name) {
            return Err(AppError::invalid_name(format!("invalid name: '{name}'")));
        }
        let full_path = format!("{parent_fs}/{name}");
        if !safe_path::is_allowed_length(&full_path) {
            return Err(AppError::invalid_name(format!("path too long: {full_path}")));
        }
        // Reserved names are blocked for top-level docs and files only;
        // folders may use them.
        if parent_fs.is_empty() && kind != EntityKind::Folder && safe_path::is_blocked_name(name) {
            return Err(AppError::invalid_name(format!(
                "'{name}' is a reserved name at the top level"
            )));
        }
        if parent.has_child_named(name) {
            return Err(AppError::duplicate_name(format!(
                "'{name}' already exists in this folder"
            )));
        }
        Ok(())
    }

    async fn check_entity_ceiling(&self, project_id: ProjectId, total: usize) -> AppResult<()> {
        if total <= self.limits.max_entities_per_project {
            return Ok(());
        }
        warn!(
            project_id = %project_id,
            total,
            max = self.limits.max_entities_per_project,
            "Entity ceiling exceeded; putting project on cooldown"
        );
        if let Err(err) = self.cooldown.put_project_on_cooldown(project_id).await {
            warn!(project_id = %project_id, error = %err, "Failed to signal cooldown");
        }
        Err(AppError::project_too_large(format!(
            "project would hold {total} entities (max {})",
            self.limits.max_entities_per_project
        )))
    }

    async fn record_deleted_leaf(&self, project_id: ProjectId, entity: &TreeEntity) -> AppResult<()> {
        // Folders carry no external content themselves; record the leaves
        // of the whole removed subtree.
        let mut stack: Vec<&Folder> = Vec::new();
        match entity {
            TreeEntity::Doc(doc) => {
                self.store
                    .record_deleted_doc(project_id, &DeletedDoc::from_doc(doc))
                    .await?;
            }
            TreeEntity::File(file) => {
                self.store
                    .record_deleted_file(project_id, &DeletedFile::from_file(file))
                    .await?;
            }
            TreeEntity::Folder(folder) => stack.push(folder),
        }
        while let Some(folder) = stack.pop() {
            for doc in &folder.docs {
                self.store
                    .record_deleted_doc(project_id, &DeletedDoc::from_doc(doc))
                    .await?;
            }
            for file in &folder.file_refs {
                self.store
                    .record_deleted_file(project_id, &DeletedFile::from_file(file))
                    .await?;
            }
            for sub in &folder.folders {
                stack.push(sub);
            }
        }
        Ok(())
    }
}

fn with_name(entity: TreeEntity, name: &str) -> TreeEntity {
    match entity {
        TreeEntity::Doc(mut doc) => {
            doc.name = name.to_string();
            TreeEntity::Doc(doc)
        }
        TreeEntity::File(mut file) => {
            file.name = name.to_string();
            TreeEntity::File(file)
        }
        TreeEntity::Folder(mut folder) => {
            folder.name = name.to_string();
            TreeEntity::Folder(folder)
        }
    }
}
