//! Pure lookups over a tree snapshot.
//!
//! Positional paths are computed fresh on every call from the snapshot's
//! current array indices. They are valid only against that snapshot and the
//! very next conditional write; any sibling insertion or removal in between
//! invalidates them.

use dochub_core::events::structure::{EntityKind, PathEntry};
use dochub_core::types::EntityId;
use dochub_entity::TreeEntity;
use dochub_entity::folder::Folder;
use dochub_entity::path::{MongoPath, TreePath};

/// An entity located in a tree snapshot, with its computed paths.
#[derive(Debug, Clone)]
pub struct FoundEntity {
    /// The located entity (cloned out of the snapshot).
    pub entity: TreeEntity,
    /// Its filesystem and positional paths.
    pub path: TreePath,
    /// The positional path of its parent folder. `None` for the root
    /// folder, which has no parent.
    pub parent_path: Option<MongoPath>,
}

/// Find an entity by id, depth-first from the root.
///
/// `hint` narrows the search to one kind; `None` searches all three child
/// arrays. The root folder matched by id comes back with no parent and an
/// empty filesystem path.
pub fn find_by_id(tree: &Folder, id: EntityId, hint: Option<EntityKind>) -> Option<FoundEntity> {
    if tree.id == id && hint.is_none_or(|h| h == EntityKind::Folder) {
        return Some(FoundEntity {
            entity: TreeEntity::Folder(tree.clone()),
            path: TreePath::root(),
            parent_path: None,
        });
    }
    find_by_id_in(tree, &MongoPath::root(), "", id, hint)
}

fn find_by_id_in(
    folder: &Folder,
    folder_path: &MongoPath,
    fs_prefix: &str,
    id: EntityId,
    hint: Option<EntityKind>,
) -> Option<FoundEntity> {
    if hint.is_none_or(|h| h == EntityKind::Doc) {
        if let Some((i, doc)) = folder.docs.iter().enumerate().find(|(_, d)| d.id == id) {
            return Some(FoundEntity {
                entity: TreeEntity::Doc(doc.clone()),
                path: TreePath {
                    file_system: format!("{fs_prefix}/{}", doc.name),
                    mongo: folder_path.clone().child(EntityKind::Doc, i),
                },
                parent_path: Some(folder_path.clone()),
            });
        }
    }
    if hint.is_none_or(|h| h == EntityKind::File) {
        if let Some((i, file)) = folder
            .file_refs
            .iter()
            .enumerate()
            .find(|(_, f)| f.id == id)
        {
            return Some(FoundEntity {
                entity: TreeEntity::File(file.clone()),
                path: TreePath {
                    file_system: format!("{fs_prefix}/{}", file.name),
                    mongo: folder_path.clone().child(EntityKind::File, i),
                },
                parent_path: Some(folder_path.clone()),
            });
        }
    }
    for (i, sub) in folder.folders.iter().enumerate() {
        let sub_path = folder_path.clone().child(EntityKind::Folder, i);
        let sub_prefix = format!("{fs_prefix}/{}", sub.name);
        if sub.id == id && hint.is_none_or(|h| h == EntityKind::Folder) {
            return Some(FoundEntity {
                entity: TreeEntity::Folder(sub.clone()),
                path: TreePath {
                    file_system: sub_prefix,
                    mongo: sub_path,
                },
                parent_path: Some(folder_path.clone()),
            });
        }
        if let Some(found) = find_by_id_in(sub, &sub_path, &sub_prefix, id, hint) {
            return Some(found);
        }
    }
    None
}

/// Find an entity by its slash-separated filesystem path.
///
/// Folder-segment matching is case-insensitive unless `exact_case`. The
/// final segment is matched against files, then docs, then folders; when
/// legacy data holds several kinds under one name, the last match wins.
pub fn find_by_path(tree: &Folder, path: &str, exact_case: bool) -> Option<FoundEntity> {
    let stripped = path.strip_prefix('/').unwrap_or(path);
    if stripped.is_empty() {
        return Some(FoundEntity {
            entity: TreeEntity::Folder(tree.clone()),
            path: TreePath::root(),
            parent_path: None,
        });
    }
    let segments: Vec<&str> = stripped.split('/').collect();
    let (leaf_name, folder_segments) = segments.split_last()?;

    // Walk the folder segments to the parent.
    let mut parent = tree;
    let mut parent_path = MongoPath::root();
    let mut fs_prefix = String::new();
    for segment in folder_segments {
        let (i, sub) = parent
            .folders
            .iter()
            .enumerate()
            .find(|(_, f)| name_matches(&f.name, segment, exact_case))?;
        parent_path = parent_path.child(EntityKind::Folder, i);
        fs_prefix.push('/');
        fs_prefix.push_str(&sub.name);
        parent = sub;
    }

    let mut found: Option<(TreeEntity, MongoPath)> = None;
    if let Some((i, file)) = parent
        .file_refs
        .iter()
        .enumerate()
        .find(|(_, f)| name_matches(&f.name, leaf_name, exact_case))
    {
        found = Some((
            TreeEntity::File(file.clone()),
            parent_path.clone().child(EntityKind::File, i),
        ));
    }
    if let Some((i, doc)) = parent
        .docs
        .iter()
        .enumerate()
        .find(|(_, d)| name_matches(&d.name, leaf_name, exact_case))
    {
        found = Some((
            TreeEntity::Doc(doc.clone()),
            parent_path.clone().child(EntityKind::Doc, i),
        ));
    }
    if let Some((i, sub)) = parent
        .folders
        .iter()
        .enumerate()
        .find(|(_, f)| name_matches(&f.name, leaf_name, exact_case))
    {
        found = Some((
            TreeEntity::Folder(sub.clone()),
            parent_path.clone().child(EntityKind::Folder, i),
        ));
    }

    let (entity, mongo) = found?;
    Some(FoundEntity {
        path: TreePath {
            file_system: format!("{fs_prefix}/{}", entity.name()),
            mongo,
        },
        parent_path: Some(parent_path),
        entity,
    })
}

fn name_matches(candidate: &str, wanted: &str, exact_case: bool) -> bool {
    if exact_case {
        candidate == wanted
    } else {
        candidate.eq_ignore_ascii_case(wanted)
    }
}

/// Re-resolve a previously computed positional path against a (possibly
/// newer) snapshot. Used to read a just-written value out of the document
/// the storage engine returned.
pub fn find_by_mongo_path(tree: &Folder, path: &MongoPath) -> Option<TreeEntity> {
    tree.entity_at(path)
}

/// Collect every doc and file in the tree with its full filesystem path,
/// in depth-first order.
pub fn collect_leaf_entries(tree: &Folder) -> (Vec<PathEntry>, Vec<PathEntry>) {
    let mut docs = Vec::new();
    let mut files = Vec::new();
    collect_in(tree, "", &mut docs, &mut files);
    (docs, files)
}

fn collect_in(folder: &Folder, fs_prefix: &str, docs: &mut Vec<PathEntry>, files: &mut Vec<PathEntry>) {
    for doc in &folder.docs {
        docs.push(PathEntry {
            id: doc.id,
            path: format!("{fs_prefix}/{}", doc.name),
        });
    }
    for file in &folder.file_refs {
        files.push(PathEntry {
            id: file.id,
            path: format!("{fs_prefix}/{}", file.name),
        });
    }
    for sub in &folder.folders {
        let sub_prefix = format!("{fs_prefix}/{}", sub.name);
        collect_in(sub, &sub_prefix, docs, files);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dochub_entity::doc::Doc;
    use dochub_entity::file::FileRef;

    fn sample_tree() -> Folder {
        let mut root = Folder::new_root();
        root.docs.push(Doc::new("main.tex"));
        let mut chapters = Folder::new("chapters");
        chapters.docs.push(Doc::new("one.tex"));
        chapters
            .file_refs
            .push(FileRef::new("figure.png", Some("abc123".into())));
        root.folders.push(chapters);
        root
    }

    #[test]
    fn test_find_by_id_computes_both_paths() {
        let tree = sample_tree();
        let doc_id = tree.folders[0].docs[0].id;
        let found = find_by_id(&tree, doc_id, Some(EntityKind::Doc)).unwrap();
        assert_eq!(found.path.file_system, "/chapters/one.tex");
        assert_eq!(found.path.mongo.to_string(), "rootFolder.0.folders.0.docs.0");
        assert_eq!(
            found.parent_path.unwrap().to_string(),
            "rootFolder.0.folders.0"
        );
    }

    #[test]
    fn test_find_root_by_id() {
        let tree = sample_tree();
        let found = find_by_id(&tree, tree.id, None).unwrap();
        assert!(found.parent_path.is_none());
        assert_eq!(found.path.file_system, "");
        assert!(found.path.mongo.is_root());
    }

    #[test]
    fn test_hint_narrows_kind() {
        let tree = sample_tree();
        let doc_id = tree.docs[0].id;
        assert!(find_by_id(&tree, doc_id, Some(EntityKind::File)).is_none());
        assert!(find_by_id(&tree, doc_id, Some(EntityKind::Doc)).is_some());
    }

    #[test]
    fn test_find_by_path_case_insensitive_by_default() {
        let tree = sample_tree();
        let found = find_by_path(&tree, "/Chapters/ONE.tex", false).unwrap();
        assert_eq!(found.entity.name(), "one.tex");
        assert!(find_by_path(&tree, "/Chapters/ONE.tex", true).is_none());
    }

    #[test]
    fn test_path_round_trip() {
        let tree = sample_tree();
        let file_id = tree.folders[0].file_refs[0].id;
        let by_id = find_by_id(&tree, file_id, None).unwrap();
        let by_path = find_by_path(&tree, &by_id.path.file_system, true).unwrap();
        assert_eq!(by_path.entity.id(), file_id);
    }

    #[test]
    fn test_find_by_mongo_path_rereads_written_value() {
        let tree = sample_tree();
        let path = MongoPath::root()
            .child(EntityKind::Folder, 0)
            .child(EntityKind::File, 0);
        let entity = find_by_mongo_path(&tree, &path).unwrap();
        assert_eq!(entity.name(), "figure.png");
    }

    #[test]
    fn test_collect_leaf_entries_depth_first() {
        let tree = sample_tree();
        let (docs, files) = collect_leaf_entries(&tree);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].path, "/main.tex");
        assert_eq!(docs[1].path, "/chapters/one.tex");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "/chapters/figure.png");
    }
}
