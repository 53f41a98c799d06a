//! Project store on PostgreSQL.
//!
//! Each mutation is one `UPDATE ... WHERE id = $1 AND root_folder #> path
//! IS NOT NULL ... RETURNING *`: the positional path computed from the
//! caller's snapshot is both the write target and the existence guard.
//! `version` increments unconditionally, which makes stale retries
//! detectable (the guard fails once the first application landed) without
//! being retried automatically.

use async_trait::async_trait;
use sqlx::PgPool;

use dochub_core::error::{AppError, ErrorKind};
use dochub_core::result::AppResult;
use dochub_core::types::{EntityId, ProjectId};
use dochub_entity::TreeEntity;
use dochub_entity::file::FileRef;
use dochub_entity::folder::Folder;
use dochub_entity::path::MongoPath;
use dochub_entity::project::{DeletedDoc, DeletedFile, Project};

use crate::store::{ProjectStore, TreeSelection};

/// Repository for project tree documents.
#[derive(Debug, Clone)]
pub struct PgProjectStore {
    pool: PgPool,
}

impl PgProjectStore {
    /// Create a new project store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
        move |e| AppError::with_source(ErrorKind::Database, context, e)
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn create(&self, project: &Project) -> AppResult<Project> {
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects \
               (id, name, root_folder, root_doc_id, version, history_id, \
                deleted_docs, deleted_files, owner_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(serde_json::to_value(&project.root_folder)?)
        .bind(project.root_doc_id)
        .bind(project.version)
        .bind(&project.history_id)
        .bind(serde_json::to_value(&project.deleted_docs)?)
        .bind(serde_json::to_value(&project.deleted_files)?)
        .bind(project.owner_id)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::db_err("Failed to create project"))
    }

    async fn find_by_id(
        &self,
        id: ProjectId,
        selection: TreeSelection,
    ) -> AppResult<Option<Project>> {
        let mut project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::db_err("Failed to find project"))?;
        if let Some(p) = project.as_mut() {
            selection.apply(p);
        }
        Ok(project)
    }

    async fn set_history_id(&self, id: ProjectId, history_id: &str) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE projects SET history_id = $2 WHERE id = $1 AND history_id IS NULL")
                .bind(id)
                .bind(history_id)
                .execute(&self.pool)
                .await
                .map_err(Self::db_err("Failed to set history id"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_root_doc(&self, id: ProjectId, doc_id: Option<EntityId>) -> AppResult<()> {
        let result = sqlx::query("UPDATE projects SET root_doc_id = $2 WHERE id = $1")
            .bind(id)
            .bind(doc_id)
            .execute(&self.pool)
            .await
            .map_err(Self::db_err("Failed to set root doc"))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("project {id} not found")));
        }
        Ok(())
    }

    async fn push_entity(
        &self,
        id: ProjectId,
        folder_path: &MongoPath,
        entity: &TreeEntity,
    ) -> AppResult<Project> {
        let array_path = folder_path.to_pg_array_path(entity.kind());
        let guard_path = folder_path.to_pg_path();
        sqlx::query_as::<_, Project>(
            "UPDATE projects SET \
                root_folder = jsonb_set( \
                    root_folder, $2::text[], \
                    COALESCE(root_folder #> $2::text[], '[]'::jsonb) \
                        || jsonb_build_array($3::jsonb)), \
                version = version + 1, \
                updated_at = NOW() \
             WHERE id = $1 AND root_folder #> $4::text[] IS NOT NULL \
             RETURNING *",
        )
        .bind(id)
        .bind(&array_path)
        .bind(serde_json::to_value(entity)?)
        .bind(&guard_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::db_err("Failed to insert entity"))?
        .ok_or_else(|| {
            AppError::not_found(format!(
                "project {id} not found or parent folder vanished at {folder_path}"
            ))
        })
    }

    async fn pull_entity(
        &self,
        id: ProjectId,
        entity_path: &MongoPath,
        entity_id: EntityId,
    ) -> AppResult<Project> {
        let (parent_path, last) = entity_path
            .split_last()
            .ok_or_else(|| AppError::non_deletable("root folder cannot be removed"))?;
        let array_path = parent_path.to_pg_array_path(last.kind);
        let guard_path = entity_path.to_pg_path();
        sqlx::query_as::<_, Project>(
            "UPDATE projects SET \
                root_folder = jsonb_set( \
                    root_folder, $2::text[], \
                    (SELECT COALESCE(jsonb_agg(elem ORDER BY ord), '[]'::jsonb) \
                     FROM jsonb_array_elements(root_folder #> $2::text[]) \
                          WITH ORDINALITY AS t(elem, ord) \
                     WHERE elem->>'_id' <> $3)), \
                root_doc_id = CASE WHEN root_doc_id = $4 THEN NULL ELSE root_doc_id END, \
                version = version + 1, \
                updated_at = NOW() \
             WHERE id = $1 AND root_folder #> $5::text[] IS NOT NULL \
             RETURNING *",
        )
        .bind(id)
        .bind(&array_path)
        .bind(entity_id.to_string())
        .bind(entity_id)
        .bind(&guard_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::db_err("Failed to remove entity"))?
        .ok_or_else(|| {
            AppError::not_found(format!(
                "project {id} not found or entity vanished at {entity_path}"
            ))
        })
    }

    async fn rename_entity_at(
        &self,
        id: ProjectId,
        entity_path: &MongoPath,
        new_name: &str,
    ) -> AppResult<Project> {
        let mut name_path = entity_path.to_pg_path();
        name_path.push("name".to_string());
        let guard_path = entity_path.to_pg_path();
        sqlx::query_as::<_, Project>(
            "UPDATE projects SET \
                root_folder = jsonb_set(root_folder, $2::text[], to_jsonb($3::text)), \
                version = version + 1, \
                updated_at = NOW() \
             WHERE id = $1 AND root_folder #> $4::text[] IS NOT NULL \
             RETURNING *",
        )
        .bind(id)
        .bind(&name_path)
        .bind(new_name)
        .bind(&guard_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::db_err("Failed to rename entity"))?
        .ok_or_else(|| {
            AppError::not_found(format!(
                "project {id} not found or entity vanished at {entity_path}"
            ))
        })
    }

    async fn replace_file_at(
        &self,
        id: ProjectId,
        file_path: &MongoPath,
        new_file: &FileRef,
    ) -> AppResult<Project> {
        let element_path = file_path.to_pg_path();
        // Only identity/content fields change; name and position stay.
        let overlay = serde_json::json!({
            "_id": new_file.id,
            "hash": new_file.hash,
            "linkedFileData": new_file.linked_file_data,
            "created": new_file.created,
        });
        sqlx::query_as::<_, Project>(
            "UPDATE projects SET \
                root_folder = jsonb_set( \
                    root_folder, $2::text[], \
                    (root_folder #> $2::text[]) || $3::jsonb \
                        || jsonb_build_object('rev', \
                            COALESCE(((root_folder #> $2::text[])->>'rev')::bigint, 0) + 1)), \
                version = version + 1, \
                updated_at = NOW() \
             WHERE id = $1 AND root_folder #> $2::text[] IS NOT NULL \
             RETURNING *",
        )
        .bind(id)
        .bind(&element_path)
        .bind(overlay)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::db_err("Failed to replace file"))?
        .ok_or_else(|| {
            AppError::not_found(format!(
                "project {id} not found or file vanished at {file_path}"
            ))
        })
    }

    async fn replace_root_folder(&self, id: ProjectId, root: &Folder) -> AppResult<Project> {
        // Guarded on the current root being structurally empty: bulk import
        // only ever targets a brand-new project.
        sqlx::query_as::<_, Project>(
            "UPDATE projects SET \
                root_folder = $2::jsonb, \
                version = version + 1, \
                updated_at = NOW() \
             WHERE id = $1 \
               AND root_folder #> '{folders,0}' IS NULL \
               AND root_folder #> '{docs,0}' IS NULL \
               AND root_folder #> '{fileRefs,0}' IS NULL \
             RETURNING *",
        )
        .bind(id)
        .bind(serde_json::to_value(root)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::db_err("Failed to replace root folder"))?
        .ok_or_else(|| {
            AppError::already_populated(format!(
                "project {id} not found or folder structure already exists"
            ))
        })
    }

    async fn record_deleted_doc(&self, id: ProjectId, doc: &DeletedDoc) -> AppResult<()> {
        sqlx::query(
            "UPDATE projects SET \
                deleted_docs = deleted_docs || jsonb_build_array($2::jsonb) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(serde_json::to_value(doc)?)
        .execute(&self.pool)
        .await
        .map_err(Self::db_err("Failed to record deleted doc"))?;
        Ok(())
    }

    async fn record_deleted_file(&self, id: ProjectId, file: &DeletedFile) -> AppResult<()> {
        sqlx::query(
            "UPDATE projects SET \
                deleted_files = deleted_files || jsonb_build_array($2::jsonb) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(serde_json::to_value(file)?)
        .execute(&self.pool)
        .await
        .map_err(Self::db_err("Failed to record deleted file"))?;
        Ok(())
    }

    async fn delete(&self, id: ProjectId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Self::db_err("Failed to delete project"))?;
        Ok(result.rows_affected() > 0)
    }
}
