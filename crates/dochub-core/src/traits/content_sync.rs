//! Contract with the content-synchronization engine (the document updater).

use async_trait::async_trait;

use crate::events::structure::{PathEntry, StructureChanges};
use crate::result::AppResult;
use crate::types::{ProjectId, UserId};

/// Client for the external service that keeps live editing sessions
/// consistent with the stored tree.
///
/// Calls for a single project must be issued in the order the corresponding
/// mutations committed; the per-project lock provides that ordering.
#[async_trait]
pub trait ContentSyncClient: Send + Sync + 'static {
    /// Inform the engine that the project's structure changed.
    async fn update_project_structure(
        &self,
        project_id: ProjectId,
        history_id: Option<&str>,
        user_id: UserId,
        changes: &StructureChanges,
    ) -> AppResult<()>;

    /// Push the complete current doc/file path sets so the engine can
    /// rebuild its state from scratch. Recovery path after a notification
    /// failure left the two sides diverged.
    async fn resync_project_structure(
        &self,
        project_id: ProjectId,
        history_id: Option<&str>,
        docs: &[PathEntry],
        files: &[PathEntry],
    ) -> AppResult<()>;
}
