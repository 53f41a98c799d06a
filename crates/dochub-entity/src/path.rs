//! Positional paths into the stored tree document.
//!
//! A [`MongoPath`] names the exact position of a node inside the nested
//! document at one moment in time: `rootFolder.0.folders.2.docs.1`. Each
//! index is the node's current position among its typed siblings, so any
//! sibling insertion or removal invalidates previously computed paths. Paths
//! are therefore transient: recomputed fresh on every lookup and used only
//! for the next conditional write.

use std::fmt;

use serde::{Deserialize, Serialize};

use dochub_core::events::structure::EntityKind;

/// One step down the tree: a typed sibling array and an index into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Which typed child array to descend into.
    pub kind: EntityKind,
    /// The node's index within that array.
    pub index: usize,
}

/// A positional path from the root folder to a node.
///
/// An empty path addresses the root folder itself. Every step except the
/// last must descend through a `folders` array.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MongoPath {
    steps: Vec<PathStep>,
}

impl MongoPath {
    /// The path of the root folder.
    pub fn root() -> Self {
        Self::default()
    }

    /// Whether this path addresses the root folder.
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// The steps of this path, outermost first.
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Extend the path by one step, consuming self.
    pub fn child(mut self, kind: EntityKind, index: usize) -> Self {
        self.steps.push(PathStep { kind, index });
        self
    }

    /// Split off the final step, yielding the parent folder's path.
    ///
    /// `None` for the root path, which has no parent.
    pub fn split_last(&self) -> Option<(MongoPath, PathStep)> {
        let (last, rest) = self.steps.split_last()?;
        Some((
            MongoPath {
                steps: rest.to_vec(),
            },
            *last,
        ))
    }

    /// The Postgres `text[]` path addressing this node inside the stored
    /// `root_folder` JSONB column.
    pub fn to_pg_path(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.steps.len() * 2);
        for step in &self.steps {
            out.push(step.kind.array_field().to_string());
            out.push(step.index.to_string());
        }
        out
    }

    /// The Postgres `text[]` path of the typed child array `kind` of the
    /// folder this path addresses.
    pub fn to_pg_array_path(&self, kind: EntityKind) -> Vec<String> {
        let mut out = self.to_pg_path();
        out.push(kind.array_field().to_string());
        out
    }
}

impl fmt::Display for MongoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rootFolder.0")?;
        for step in &self.steps {
            write!(f, ".{}.{}", step.kind.array_field(), step.index)?;
        }
        Ok(())
    }
}

/// The pair of paths computed for a node by a tree lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePath {
    /// Slash-separated human path from the root, e.g. `/chapters/one.tex`.
    /// Empty string for the root folder itself.
    pub file_system: String,
    /// The positional path into the stored document.
    pub mongo: MongoPath,
}

impl TreePath {
    /// The path of the root folder.
    pub fn root() -> Self {
        Self {
            file_system: String::new(),
            mongo: MongoPath::root(),
        }
    }
}
