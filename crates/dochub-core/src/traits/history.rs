//! Contract with the external history/versioning service.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::ProjectId;

/// Client for the history service.
///
/// A project receives its opaque history identifier at most once, at
/// creation time; the mutation engine only ever reads it afterwards.
#[async_trait]
pub trait HistoryClient: Send + Sync + 'static {
    /// Register a project with the history service, returning its history id.
    async fn initialize_project(&self, project_id: ProjectId) -> AppResult<String>;

    /// Flush any buffered history updates for a project.
    async fn flush_project(&self, project_id: ProjectId) -> AppResult<()>;
}
