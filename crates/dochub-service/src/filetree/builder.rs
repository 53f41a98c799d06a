//! Builds a brand-new tree from flat path lists.
//!
//! Bulk import and project duplication hand over flat `(path, entity)`
//! lists; this module folds them into one nested root folder, creating
//! intermediate folders on demand and rejecting any two entities that
//! claim the same full path.

use std::collections::{HashMap, HashSet};

use dochub_core::error::AppError;
use dochub_core::result::AppResult;
use dochub_entity::doc::Doc;
use dochub_entity::file::FileRef;
use dochub_entity::folder::Folder;

use super::safe_path;

/// A doc to place at a path.
#[derive(Debug, Clone)]
pub struct DocEntry {
    /// Full path including the doc's name, e.g. `/chapters/one.tex`.
    pub path: String,
    /// The doc itself.
    pub doc: Doc,
}

/// A file to place at a path.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Full path including the file's name.
    pub path: String,
    /// The file itself.
    pub file: FileRef,
}

struct FolderNode {
    folder: Folder,
    // Child folder paths in creation order.
    children: Vec<String>,
}

/// Assembler for a new root folder.
///
/// Docs are placed first, then files, each list in input order, so the
/// output is deterministic given deterministic input.
#[derive(Default)]
pub struct FolderStructureBuilder {
    nodes: HashMap<String, FolderNode>,
    seen_paths: HashSet<String>,
}

impl FolderStructureBuilder {
    /// Create a builder holding just an empty root.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            "/".to_string(),
            FolderNode {
                folder: Folder::new_root(),
                children: Vec::new(),
            },
        );
        let mut seen_paths = HashSet::new();
        seen_paths.insert("/".to_string());
        Self { nodes, seen_paths }
    }

    /// Place a doc at its path.
    pub fn add_doc(&mut self, path: &str, doc: Doc) -> AppResult<()> {
        let (dir, _) = self.claim_leaf_path(path)?;
        self.ensure_folder(&dir)?;
        self.nodes
            .get_mut(&dir)
            .map(|node| node.folder.docs.push(doc))
            .ok_or_else(|| AppError::internal(format!("folder {dir} vanished during build")))
    }

    /// Place a file at its path.
    pub fn add_file(&mut self, path: &str, file: FileRef) -> AppResult<()> {
        let (dir, _) = self.claim_leaf_path(path)?;
        self.ensure_folder(&dir)?;
        self.nodes
            .get_mut(&dir)
            .map(|node| node.folder.file_refs.push(file))
            .ok_or_else(|| AppError::internal(format!("folder {dir} vanished during build")))
    }

    /// Consume the builder, yielding the assembled root folder.
    pub fn finish(mut self) -> Folder {
        assemble(&mut self.nodes, "/")
    }

    fn claim_leaf_path(&mut self, path: &str) -> AppResult<(String, String)> {
        let full = normalize(path);
        if !safe_path::is_clean_path(&full) || !safe_path::is_allowed_length(&full) {
            return Err(AppError::invalid_name(format!("invalid entity path: {path}")));
        }
        if !self.seen_paths.insert(full.clone()) {
            return Err(AppError::duplicate_entity(format!(
                "duplicate entity path: {full}"
            )));
        }
        let split = full.rfind('/').unwrap_or(0);
        let dir = if split == 0 {
            "/".to_string()
        } else {
            full[..split].to_string()
        };
        let name = full[split + 1..].to_string();
        Ok((dir, name))
    }

    // In-memory mkdirp: every ancestor is created and registered before its
    // child, so the final assembly never dangles.
    fn ensure_folder(&mut self, dir: &str) -> AppResult<()> {
        if self.nodes.contains_key(dir) {
            return Ok(());
        }
        let split = dir.rfind('/').unwrap_or(0);
        let parent = if split == 0 { "/" } else { &dir[..split] };
        let name = dir[split + 1..].to_string();
        self.ensure_folder(parent)?;
        if !self.seen_paths.insert(dir.to_string()) {
            return Err(AppError::duplicate_entity(format!(
                "folder path collides with an existing entity: {dir}"
            )));
        }
        self.nodes.insert(
            dir.to_string(),
            FolderNode {
                folder: Folder::new(name),
                children: Vec::new(),
            },
        );
        self.nodes
            .get_mut(parent)
            .map(|node| node.children.push(dir.to_string()))
            .ok_or_else(|| AppError::internal(format!("folder {parent} vanished during build")))
    }
}

fn normalize(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn assemble(nodes: &mut HashMap<String, FolderNode>, path: &str) -> Folder {
    let Some(node) = nodes.remove(path) else {
        return Folder::new_root();
    };
    let mut folder = node.folder;
    for child in &node.children {
        folder.folders.push(assemble(nodes, child));
    }
    folder
}

/// Build a complete root folder from flat doc and file entry lists.
pub fn build_folder_structure(
    doc_entries: Vec<DocEntry>,
    file_entries: Vec<FileEntry>,
) -> AppResult<Folder> {
    let mut builder = FolderStructureBuilder::new();
    for entry in doc_entries {
        builder.add_doc(&entry.path, entry.doc)?;
    }
    for entry in file_entries {
        builder.add_file(&entry.path, entry.file)?;
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dochub_core::error::ErrorKind;

    #[test]
    fn test_builds_nested_structure() {
        let root = build_folder_structure(
            vec![
                DocEntry {
                    path: "/main.tex".into(),
                    doc: Doc::new("main.tex"),
                },
                DocEntry {
                    path: "/chapters/one.tex".into(),
                    doc: Doc::new("one.tex"),
                },
                DocEntry {
                    path: "/chapters/two.tex".into(),
                    doc: Doc::new("two.tex"),
                },
            ],
            vec![FileEntry {
                path: "/images/logo.png".into(),
                file: FileRef::new("logo.png", Some("h1".into())),
            }],
        )
        .unwrap();

        assert_eq!(root.name, "rootFolder");
        assert_eq!(root.docs.len(), 1);
        assert_eq!(root.folders.len(), 2);
        let chapters = root.child_folder("chapters", true).unwrap();
        assert_eq!(chapters.docs.len(), 2);
        assert_eq!(chapters.docs[0].name, "one.tex");
        let images = root.child_folder("images", true).unwrap();
        assert_eq!(images.file_refs.len(), 1);
    }

    #[test]
    fn test_rejects_duplicate_paths() {
        let err = build_folder_structure(
            vec![
                DocEntry {
                    path: "/a.tex".into(),
                    doc: Doc::new("a.tex"),
                },
                DocEntry {
                    path: "/a.tex".into(),
                    doc: Doc::new("a.tex"),
                },
            ],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateEntity);
    }

    #[test]
    fn test_rejects_file_colliding_with_doc_path() {
        let err = build_folder_structure(
            vec![DocEntry {
                path: "/a.tex".into(),
                doc: Doc::new("a.tex"),
            }],
            vec![FileEntry {
                path: "/a.tex".into(),
                file: FileRef::new("a.tex", None),
            }],
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateEntity);
    }

    #[test]
    fn test_rejects_folder_colliding_with_leaf_path() {
        // "/a" is claimed by a doc, then needed as a folder.
        let err = build_folder_structure(
            vec![
                DocEntry {
                    path: "/a".into(),
                    doc: Doc::new("a"),
                },
                DocEntry {
                    path: "/a/b.tex".into(),
                    doc: Doc::new("b.tex"),
                },
            ],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateEntity);
    }

    #[test]
    fn test_rejects_invalid_path() {
        let err = build_folder_structure(
            vec![DocEntry {
                path: "/bad*name.tex".into(),
                doc: Doc::new("bad*name.tex"),
            }],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidName);
    }

    #[test]
    fn test_shared_prefix_creates_one_folder() {
        let root = build_folder_structure(
            vec![
                DocEntry {
                    path: "/a/b/one.tex".into(),
                    doc: Doc::new("one.tex"),
                },
                DocEntry {
                    path: "/a/b/two.tex".into(),
                    doc: Doc::new("two.tex"),
                },
            ],
            vec![],
        )
        .unwrap();
        assert_eq!(root.folders.len(), 1);
        assert_eq!(root.folders[0].folders.len(), 1);
        assert_eq!(root.folders[0].folders[0].docs.len(), 2);
    }
}
