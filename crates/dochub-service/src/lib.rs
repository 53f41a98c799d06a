//! # dochub-service
//!
//! The filetree mutation engine and the project-level services built on it.
//! Every structural edit of a project's folder/doc/file tree goes through
//! [`filetree::TreeMutator`]: acquire the per-project lock, resolve the
//! affected nodes from a fresh snapshot, validate, issue one conditional
//! positional update, then notify downstream consumers in commit order.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod filetree;
pub mod project;

pub use context::RequestContext;
pub use filetree::{
    DocEntry, FileEntry, FolderStructureBuilder, FoundEntity, MoveResult, StructureChangeNotifier,
    TreeMutator, build_folder_structure, locator, safe_path,
};
pub use project::ProjectService;
