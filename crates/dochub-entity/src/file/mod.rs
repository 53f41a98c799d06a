//! Binary file reference entities.

pub mod model;

pub use model::{FileRef, LinkedFileData};
