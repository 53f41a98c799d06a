//! Project entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use dochub_core::types::{EntityId, ProjectId, UserId};

use crate::folder::Folder;
use crate::project::deleted::{DeletedDoc, DeletedFile};

/// The root aggregate: one project and its entire filetree.
///
/// The tree is stored denormalized as a single JSONB document in the
/// `root_folder` column; the project exclusively owns every folder, doc,
/// and file reference in it. `version` increments on every structural
/// mutation and is what downstream consumers order by.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// Project display name.
    pub name: String,
    /// The tree root. Always present, never deletable.
    #[sqlx(json)]
    pub root_folder: Folder,
    /// The doc used as the compilation entry point, if set.
    pub root_doc_id: Option<EntityId>,
    /// Monotonically incrementing structure version.
    pub version: i64,
    /// Opaque reference into the external history service. Set at most once.
    pub history_id: Option<String>,
    /// Docs removed from the tree, kept for later garbage collection.
    #[sqlx(json)]
    #[serde(default)]
    pub deleted_docs: Vec<DeletedDoc>,
    /// File references removed from the tree, kept for later garbage
    /// collection.
    #[sqlx(json)]
    #[serde(default)]
    pub deleted_files: Vec<DeletedFile>,
    /// The project owner.
    pub owner_id: UserId,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When the project was last structurally modified.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project with an empty root folder.
    pub fn new(name: impl Into<String>, owner_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            name: name.into(),
            root_folder: Folder::new_root(),
            root_doc_id: None,
            version: 1,
            history_id: None,
            deleted_docs: Vec::new(),
            deleted_files: Vec::new(),
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Count all entities (docs + files + folders) in the tree by full
    /// recursive traversal.
    pub fn count_entities(&self) -> usize {
        self.root_folder.count_entities()
    }
}
