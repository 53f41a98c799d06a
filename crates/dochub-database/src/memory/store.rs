//! In-memory twin of the PostgreSQL project store.
//!
//! Each mutation takes the project entry's lock for its whole duration, so
//! the guard-then-write sequence is as atomic as the single conditional
//! UPDATE it mirrors. Guard failures surface as the same error kinds.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use dochub_core::error::AppError;
use dochub_core::result::AppResult;
use dochub_core::types::{EntityId, ProjectId};
use dochub_entity::TreeEntity;
use dochub_entity::file::FileRef;
use dochub_entity::folder::Folder;
use dochub_entity::path::MongoPath;
use dochub_entity::project::{DeletedDoc, DeletedFile, Project};

use crate::store::{ProjectStore, TreeSelection};

/// Project store over a process-local map.
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    projects: DashMap<ProjectId, Project>,
}

impl MemoryProjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored projects.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the store holds no projects.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    fn mutate<F>(&self, id: ProjectId, f: F) -> AppResult<Project>
    where
        F: FnOnce(&mut Project) -> AppResult<()>,
    {
        let mut entry = self
            .projects
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("project {id} not found")))?;
        f(entry.value_mut())?;
        entry.version += 1;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn create(&self, project: &Project) -> AppResult<Project> {
        self.projects.insert(project.id, project.clone());
        Ok(project.clone())
    }

    async fn find_by_id(
        &self,
        id: ProjectId,
        selection: TreeSelection,
    ) -> AppResult<Option<Project>> {
        let mut project = self.projects.get(&id).map(|p| p.clone());
        if let Some(p) = project.as_mut() {
            selection.apply(p);
        }
        Ok(project)
    }

    async fn set_history_id(&self, id: ProjectId, history_id: &str) -> AppResult<bool> {
        let Some(mut entry) = self.projects.get_mut(&id) else {
            return Ok(false);
        };
        if entry.history_id.is_some() {
            return Ok(false);
        }
        entry.history_id = Some(history_id.to_string());
        Ok(true)
    }

    async fn set_root_doc(&self, id: ProjectId, doc_id: Option<EntityId>) -> AppResult<()> {
        let mut entry = self
            .projects
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("project {id} not found")))?;
        entry.root_doc_id = doc_id;
        Ok(())
    }

    async fn push_entity(
        &self,
        id: ProjectId,
        folder_path: &MongoPath,
        entity: &TreeEntity,
    ) -> AppResult<Project> {
        self.mutate(id, |project| {
            project
                .root_folder
                .insert_at(folder_path, entity.clone())
                .map(|_| ())
                .ok_or_else(|| {
                    AppError::not_found(format!("parent folder vanished at {folder_path}"))
                })
        })
    }

    async fn pull_entity(
        &self,
        id: ProjectId,
        entity_path: &MongoPath,
        entity_id: EntityId,
    ) -> AppResult<Project> {
        self.mutate(id, |project| {
            if project.root_folder.entity_at(entity_path).is_none() {
                return Err(AppError::not_found(format!(
                    "entity vanished at {entity_path}"
                )));
            }
            project
                .root_folder
                .remove_at(entity_path, entity_id)
                .ok_or_else(|| AppError::not_found(format!("entity {entity_id} not found")))?;
            if project.root_doc_id == Some(entity_id) {
                project.root_doc_id = None;
            }
            Ok(())
        })
    }

    async fn rename_entity_at(
        &self,
        id: ProjectId,
        entity_path: &MongoPath,
        new_name: &str,
    ) -> AppResult<Project> {
        self.mutate(id, |project| {
            if project.root_folder.rename_at(entity_path, new_name) {
                Ok(())
            } else {
                Err(AppError::not_found(format!(
                    "entity vanished at {entity_path}"
                )))
            }
        })
    }

    async fn replace_file_at(
        &self,
        id: ProjectId,
        file_path: &MongoPath,
        new_file: &FileRef,
    ) -> AppResult<Project> {
        self.mutate(id, |project| {
            if project.root_folder.replace_file_at(file_path, new_file) {
                Ok(())
            } else {
                Err(AppError::not_found(format!("file vanished at {file_path}")))
            }
        })
    }

    async fn replace_root_folder(&self, id: ProjectId, root: &Folder) -> AppResult<Project> {
        let result = self.mutate(id, |project| {
            if !project.root_folder.is_empty() {
                return Err(AppError::already_populated(format!(
                    "project {id} already has a folder structure"
                )));
            }
            project.root_folder = root.clone();
            Ok(())
        });
        // A missing project reports the same way as a failed guard, matching
        // the single-statement backend.
        result.map_err(|e| {
            if e.kind == dochub_core::error::ErrorKind::NotFound {
                AppError::already_populated(format!(
                    "project {id} not found or folder structure already exists"
                ))
            } else {
                e
            }
        })
    }

    async fn record_deleted_doc(&self, id: ProjectId, doc: &DeletedDoc) -> AppResult<()> {
        if let Some(mut entry) = self.projects.get_mut(&id) {
            entry.deleted_docs.push(doc.clone());
        }
        Ok(())
    }

    async fn record_deleted_file(&self, id: ProjectId, file: &DeletedFile) -> AppResult<()> {
        if let Some(mut entry) = self.projects.get_mut(&id) {
            entry.deleted_files.push(file.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: ProjectId) -> AppResult<bool> {
        Ok(self.projects.remove(&id).is_some())
    }
}
