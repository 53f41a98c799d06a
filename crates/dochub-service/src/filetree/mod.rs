//! The filetree mutation engine.
//!
//! `safe_path`, `locator`, and `builder` are pure; `mutator` stitches them
//! to the store, lock, and notifier into the locked
//! resolve/validate/write transactions that every structural edit runs as.

pub mod builder;
pub mod locator;
pub mod mutator;
pub mod notifier;
pub mod safe_path;

pub use builder::{DocEntry, FileEntry, FolderStructureBuilder, build_folder_structure};
pub use locator::FoundEntity;
pub use mutator::{CreatedFolder, MkdirpResult, MoveResult, MutationOutcome, TreeMutator};
pub use notifier::StructureChangeNotifier;
