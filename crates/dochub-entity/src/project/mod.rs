//! Project aggregate.

pub mod deleted;
pub mod model;

pub use deleted::{DeletedDoc, DeletedFile};
pub use model::Project;
