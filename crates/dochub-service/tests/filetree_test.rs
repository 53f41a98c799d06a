//! End-to-end scenarios for the filetree mutation engine.

mod helpers;

use std::sync::Arc;

use dochub_core::error::ErrorKind;
use dochub_core::events::structure::EntityKind;
use dochub_database::{ProjectStore, TreeSelection};
use dochub_entity::TreeEntity;
use dochub_entity::doc::Doc;
use dochub_entity::file::FileRef;
use dochub_entity::project::Project;
use dochub_service::filetree::{DocEntry, locator};

use helpers::TestApp;

async fn blank_project(app: &TestApp) -> Project {
    app.store
        .create(&Project::new("thesis", app.ctx.user_id))
        .await
        .unwrap()
}

async fn reload(app: &TestApp, project: &Project) -> Project {
    app.store
        .find_by_id(project.id, TreeSelection::Full)
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn test_new_project_insert_increments_version() {
    let app = TestApp::new();
    let project = blank_project(&app).await;
    assert!(project.root_folder.is_empty());
    assert_eq!(project.root_folder.name, "rootFolder");

    let outcome = app
        .mutator
        .insert_entity(
            &app.ctx,
            project.id,
            None,
            TreeEntity::Doc(Doc::new("main.tex")),
        )
        .await
        .unwrap();

    assert_eq!(outcome.path.file_system, "/main.tex");
    assert_eq!(outcome.project.version, project.version + 1);
}

#[tokio::test]
async fn test_sibling_names_stay_unique_across_mutations() {
    let app = TestApp::new();
    let project = blank_project(&app).await;

    app.mutator
        .insert_entity(
            &app.ctx,
            project.id,
            None,
            TreeEntity::Doc(Doc::new("a.tex")),
        )
        .await
        .unwrap();
    let b = app
        .mutator
        .insert_entity(
            &app.ctx,
            project.id,
            None,
            TreeEntity::File(FileRef::new("b.png", None)),
        )
        .await
        .unwrap();

    // Inserting any kind under a taken name fails.
    let err = app
        .mutator
        .insert_entity(
            &app.ctx,
            project.id,
            None,
            TreeEntity::Folder(dochub_entity::folder::Folder::new("a.tex")),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateName);

    // Renaming onto a taken name fails too.
    let err = app
        .mutator
        .rename_entity(
            &app.ctx,
            project.id,
            b.entity.id(),
            EntityKind::File,
            "a.tex",
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateName);

    let tree = reload(&app, &project).await.root_folder;
    let mut names: Vec<&str> = tree
        .docs
        .iter()
        .map(|d| d.name.as_str())
        .chain(tree.file_refs.iter().map(|f| f.name.as_str()))
        .chain(tree.folders.iter().map(|f| f.name.as_str()))
        .collect();
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), total);
}

#[tokio::test]
async fn test_path_round_trip_after_moves() {
    let app = TestApp::new();
    let project = blank_project(&app).await;
    let doc = app
        .mutator
        .insert_entity(
            &app.ctx,
            project.id,
            None,
            TreeEntity::Doc(Doc::new("one.tex")),
        )
        .await
        .unwrap();
    let dest = app
        .mutator
        .mkdirp(&app.ctx, project.id, "/a/b", false)
        .await
        .unwrap();
    app.mutator
        .move_entity(
            &app.ctx,
            project.id,
            doc.entity.id(),
            EntityKind::Doc,
            Some(dest.folder.id),
        )
        .await
        .unwrap();

    let tree = reload(&app, &project).await.root_folder;
    let by_id = locator::find_by_id(&tree, doc.entity.id(), None).unwrap();
    let by_path = locator::find_by_path(&tree, &by_id.path.file_system, true).unwrap();
    assert_eq!(by_path.entity.id(), doc.entity.id());
    assert_eq!(by_id.path.file_system, "/a/b/one.tex");
}

#[tokio::test]
async fn test_move_into_descendant_leaves_tree_unchanged() {
    let app = TestApp::new();
    let project = blank_project(&app).await;
    app.mutator
        .insert_entity(
            &app.ctx,
            project.id,
            None,
            TreeEntity::Doc(Doc::new("keep.tex")),
        )
        .await
        .unwrap();
    let foo = app
        .mutator
        .mkdirp(&app.ctx, project.id, "/foo", false)
        .await
        .unwrap();
    let sub = app
        .mutator
        .mkdirp(&app.ctx, project.id, "/foo/sub", false)
        .await
        .unwrap();
    let before = reload(&app, &project).await;

    let err = app
        .mutator
        .move_entity(
            &app.ctx,
            project.id,
            foo.folder.id,
            EntityKind::Folder,
            Some(sub.folder.id),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidMove);

    let after = reload(&app, &project).await;
    assert_eq!(after.version, before.version);
    assert_eq!(
        locator::collect_leaf_entries(&after.root_folder),
        locator::collect_leaf_entries(&before.root_folder)
    );
}

#[tokio::test]
async fn test_bulk_install_on_populated_project_keeps_existing_doc() {
    let app = TestApp::new();
    let project = blank_project(&app).await;
    app.mutator
        .insert_entity(
            &app.ctx,
            project.id,
            None,
            TreeEntity::Doc(Doc::new("existing.tex")),
        )
        .await
        .unwrap();

    let err = app
        .mutator
        .create_new_folder_structure(
            &app.ctx,
            project.id,
            vec![DocEntry {
                path: "/imported.tex".into(),
                doc: Doc::new("imported.tex"),
            }],
            vec![],
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AlreadyPopulated);

    let tree = reload(&app, &project).await.root_folder;
    assert_eq!(tree.docs.len(), 1);
    assert_eq!(tree.docs[0].name, "existing.tex");
}

#[tokio::test]
async fn test_concurrent_inserts_both_land() {
    let app = TestApp::new();
    let project = blank_project(&app).await;
    let mutator = Arc::clone(&app.mutator);

    let a = {
        let mutator = Arc::clone(&mutator);
        let ctx = app.ctx.clone();
        let project_id = project.id;
        tokio::spawn(async move {
            mutator
                .insert_entity(&ctx, project_id, None, TreeEntity::Doc(Doc::new("a.tex")))
                .await
        })
    };
    let b = {
        let ctx = app.ctx.clone();
        let project_id = project.id;
        tokio::spawn(async move {
            mutator
                .insert_entity(&ctx, project_id, None, TreeEntity::Doc(Doc::new("b.tex")))
                .await
        })
    };

    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    let after = reload(&app, &project).await;
    assert_eq!(after.version, project.version + 2);
    let (docs, _) = locator::collect_leaf_entries(&after.root_folder);
    let mut paths: Vec<String> = docs.into_iter().map(|d| d.path).collect();
    paths.sort();
    assert_eq!(paths, ["/a.tex", "/b.tex"]);
}

#[tokio::test]
async fn test_notifications_arrive_in_commit_order() {
    let app = TestApp::new();
    let project = blank_project(&app).await;

    for name in ["one.tex", "two.tex", "three.tex"] {
        app.mutator
            .insert_entity(&app.ctx, project.id, None, TreeEntity::Doc(Doc::new(name)))
            .await
            .unwrap();
    }

    let updates = app.sync.updates.lock().unwrap();
    let versions: Vec<i64> = updates.iter().map(|u| u.changes.new_version).collect();
    assert_eq!(
        versions,
        [project.version + 1, project.version + 2, project.version + 3]
    );
    // Each delta's old set is the previous delta's new set.
    for pair in updates.windows(2) {
        assert_eq!(pair[0].changes.new_docs, pair[1].changes.old_docs);
    }
}

#[tokio::test]
async fn test_deleting_root_doc_unsets_reference() {
    let app = TestApp::new();
    let project = blank_project(&app).await;
    let doc = app
        .mutator
        .insert_entity(
            &app.ctx,
            project.id,
            None,
            TreeEntity::Doc(Doc::new("main.tex")),
        )
        .await
        .unwrap();
    app.projects
        .set_root_doc(project.id, doc.entity.id())
        .await
        .unwrap();

    app.mutator
        .delete_entity(&app.ctx, project.id, doc.entity.id(), EntityKind::Doc)
        .await
        .unwrap();

    let after = reload(&app, &project).await;
    assert_eq!(after.root_doc_id, None);
    assert_eq!(after.deleted_docs.len(), 1);
}
