//! Cooldown signalling for oversized projects.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::ProjectId;

/// Side channel used to put a project on cooldown when it exceeds the
/// entity-count ceiling, so upstream traffic shaping can throttle it.
#[async_trait]
pub trait CooldownSignal: Send + Sync + 'static {
    /// Mark the project as on cooldown.
    async fn put_project_on_cooldown(&self, project_id: ProjectId) -> AppResult<()>;
}
