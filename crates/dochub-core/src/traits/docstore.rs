//! Contract with the external document-content store.
//!
//! Doc content lines live outside the tree; the tree only holds references.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{EntityId, ProjectId};

/// Result of a docstore update.
#[derive(Debug, Clone, Copy)]
pub struct DocUpdateResult {
    /// Whether the stored content actually changed.
    pub modified: bool,
    /// The revision after the update.
    pub rev: i64,
}

/// Client for the external docstore service.
#[async_trait]
pub trait DocstoreClient: Send + Sync + 'static {
    /// Overwrite a doc's content lines.
    async fn update_doc(
        &self,
        project_id: ProjectId,
        doc_id: EntityId,
        lines: &[String],
        base_rev: i64,
    ) -> AppResult<DocUpdateResult>;

    /// Destroy all docs of a project. Called on hard delete only.
    async fn destroy_project(&self, project_id: ProjectId) -> AppResult<()>;
}
