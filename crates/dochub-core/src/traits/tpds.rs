//! Contract with the third-party data store mirror.
//!
//! The mirror replicates single-entity changes to an outside system (e.g. a
//! desktop sync client). Every call is best-effort: failures are logged by
//! the caller and never block the primary mutation's success. Bulk
//! operations do not go through this interface; they trigger a full resync
//! instead.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{EntityId, ProjectId};

/// Client for the third-party mirror service.
#[async_trait]
pub trait TpdsClient: Send + Sync + 'static {
    /// Mirror a newly added doc.
    async fn add_doc(
        &self,
        project_id: ProjectId,
        project_name: &str,
        doc_id: EntityId,
        path: &str,
        rev: i64,
    ) -> AppResult<()>;

    /// Mirror a newly added file.
    async fn add_file(
        &self,
        project_id: ProjectId,
        project_name: &str,
        file_id: EntityId,
        path: &str,
        rev: i64,
    ) -> AppResult<()>;

    /// Mirror a move or rename as a path change.
    async fn move_entity(
        &self,
        project_id: ProjectId,
        project_name: &str,
        start_path: &str,
        end_path: &str,
        rev: i64,
    ) -> AppResult<()>;

    /// Mirror a deletion.
    async fn delete_entity(
        &self,
        project_id: ProjectId,
        project_name: &str,
        path: &str,
    ) -> AppResult<()>;
}
