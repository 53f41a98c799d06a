//! Contract with the content-addressed binary blob store.

use std::path::Path;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{EntityId, ProjectId};

/// Client for the external file/blob store.
#[async_trait]
pub trait FileStoreClient: Send + Sync + 'static {
    /// Upload a file from local disk, returning its public URL.
    async fn upload_from_disk(
        &self,
        project_id: ProjectId,
        file_id: EntityId,
        source: &Path,
    ) -> AppResult<String>;

    /// Copy a stored blob between projects, returning the new URL.
    async fn copy_file(
        &self,
        src_project_id: ProjectId,
        src_file_id: EntityId,
        dest_project_id: ProjectId,
        dest_file_id: EntityId,
    ) -> AppResult<String>;
}
