//! Integration tests for the folder namespace.

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use libris_core::error::{AppError, ErrorKind};
use libris_core::result::AppResult;
use libris_core::traits::storage::StorageProvider;
use libris_database::store::{FileStore, FolderStore};
use libris_service::DeletionStatus;
use libris_storage::MemoryStorageProvider;

use helpers::TestApp;

#[tokio::test]
async fn test_rename_root_updates_child_path() {
    let app = TestApp::new();
    let a = app.folder("A", None).await;
    let b = app.folder("B", Some(&a)).await;
    assert_eq!(b.path, vec!["A", "B"]);

    app.library.folders().rename(a.id, app.owner, "A2").await.unwrap();

    assert_eq!(app.path_of(&b).await, vec!["A2", "B"]);
    assert_eq!(
        app.library.breadcrumbs().resolve(b.id, app.owner).await.unwrap(),
        vec!["A2", "B"]
    );
}

#[tokio::test]
async fn test_rename_keeps_descendant_suffixes() {
    let app = TestApp::new();
    let a = app.folder("A", None).await;
    let b = app.folder("B", Some(&a)).await;
    let c = app.folder("C", Some(&b)).await;
    let d = app.folder("D", Some(&c)).await;

    app.library.folders().rename(b.id, app.owner, "Bio").await.unwrap();

    assert_eq!(app.path_of(&a).await, vec!["A"]);
    assert_eq!(app.path_of(&c).await, vec!["A", "Bio", "C"]);
    assert_eq!(app.path_of(&d).await, vec!["A", "Bio", "C", "D"]);
    app.assert_paths_consistent().await;
}

#[tokio::test]
async fn test_move_between_roots() {
    let app = TestApp::new();
    let a = app.folder("A", None).await;
    let c = app.folder("C", None).await;
    let b = app.folder("B", Some(&a)).await;

    app.library
        .folders()
        .move_folder(b.id, app.owner, Some(c.id))
        .await
        .unwrap();

    assert_eq!(app.path_of(&b).await, vec!["C", "B"]);
    assert!(
        app.library
            .folders()
            .list_children(a.id, app.owner)
            .await
            .unwrap()
            .is_empty()
    );
    app.assert_paths_consistent().await;
}

#[tokio::test]
async fn test_move_into_descendant_is_rejected() {
    let app = TestApp::new();
    let a = app.folder("A", None).await;
    let b = app.folder("B", Some(&a)).await;
    let c = app.folder("C", Some(&b)).await;

    for target in [a.id, b.id, c.id] {
        let err = app
            .library
            .folders()
            .move_folder(a.id, app.owner, Some(target))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cycle);
    }

    assert!(app.reload(&a).await.unwrap().is_root());
    app.assert_paths_consistent().await;
}

#[tokio::test]
async fn test_strict_then_recursive_delete() {
    let app = TestApp::new();
    let x = app.folder("X", None).await;
    let doc = app.file("syllabus.pdf", Some(&x)).await;

    let err = app.library.folders().delete(x.id, app.owner).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NonEmptyFolder);
    assert!(app.reload(&x).await.is_some());

    let removed = app
        .library
        .folders()
        .delete_recursively(x.id, app.owner)
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let report = app
        .library
        .files()
        .delete_files_in_folder_recursively(x.id, app.owner)
        .await
        .unwrap();
    assert_eq!(report.removed(), 1);

    assert!(app.reload(&x).await.is_none());
    assert_eq!(app.store.folder_count().await, 0);
    assert_eq!(app.store.file_count().await, 0);
    assert!(!app.blobs.exists(&doc.storage_path).await.unwrap());
}

#[tokio::test]
async fn test_recursive_deletes_leave_no_nested_files() {
    let app = TestApp::new();
    let x = app.folder("X", None).await;
    let y = app.folder("Y", Some(&x)).await;
    let top = app.file("top.pdf", Some(&x)).await;
    let deep = app.file("deep.pdf", Some(&y)).await;

    let removed = app
        .library
        .folders()
        .delete_recursively(x.id, app.owner)
        .await
        .unwrap();
    assert_eq!(removed, 2);

    let report = app
        .library
        .files()
        .delete_files_in_folder_recursively(x.id, app.owner)
        .await
        .unwrap();
    assert_eq!(report.removed(), 2);

    assert_eq!(app.store.folder_count().await, 0);
    assert_eq!(app.store.file_count().await, 0);
    assert!(!app.blobs.exists(&top.storage_path).await.unwrap());
    assert!(!app.blobs.exists(&deep.storage_path).await.unwrap());
}

#[tokio::test]
async fn test_recursive_delete_empties_subtree() {
    let app = TestApp::new();
    let a = app.folder("A", None).await;
    let b = app.folder("B", Some(&a)).await;
    app.folder("C", Some(&b)).await;
    app.folder("D", Some(&a)).await;

    let removed = app
        .library
        .folders()
        .delete_recursively(a.id, app.owner)
        .await
        .unwrap();

    assert_eq!(removed, 4);
    assert!(app.library.folders().list_root(app.owner).await.unwrap().is_empty());
    assert!(
        app.store
            .find_children(app.owner, Some(b.id))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_owners_are_isolated() {
    let app = TestApp::new();
    let a = app.folder("A", None).await;
    let stranger = Uuid::new_v4();

    let folders = app.library.folders();
    assert_eq!(
        folders.rename(a.id, stranger, "Mine").await.unwrap_err().kind,
        ErrorKind::Unauthorized
    );
    assert_eq!(
        folders.delete(a.id, stranger).await.unwrap_err().kind,
        ErrorKind::Unauthorized
    );
    assert_eq!(
        app.library
            .breadcrumbs()
            .resolve(a.id, stranger)
            .await
            .unwrap_err()
            .kind,
        ErrorKind::Unauthorized
    );
    assert!(folders.list_root(stranger).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_tree_reflects_moves() {
    let app = TestApp::new();
    let a = app.folder("A", None).await;
    let b = app.folder("B", Some(&a)).await;
    let c = app.folder("C", None).await;
    app.file("one.pdf", Some(&b)).await;

    app.library
        .folders()
        .move_folder(c.id, app.owner, Some(b.id))
        .await
        .unwrap();

    let trees = app.library.tree().get_library_tree(app.owner).await.unwrap();
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].total_folders(), 3);
    assert_eq!(trees[0].total_files(), 1);
    assert_eq!(trees[0].children[0].children[0].path, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_concurrent_renames_leave_consistent_paths() {
    let app = Arc::new(TestApp::new());
    let a = app.folder("A", None).await;
    let mut parent = a.clone();
    for depth in 0..6 {
        parent = app.folder(&format!("level-{depth}"), Some(&parent)).await;
    }

    let mut handles = Vec::new();
    for i in 0..8 {
        let app = Arc::clone(&app);
        let id = a.id;
        handles.push(tokio::spawn(async move {
            app.library
                .folders()
                .rename(id, app.owner, &format!("A-{i}"))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    app.assert_paths_consistent().await;
}

/// Blob store that is down for every delete.
#[derive(Debug)]
struct BlobOutage {
    inner: MemoryStorageProvider,
}

#[async_trait]
impl StorageProvider for BlobOutage {
    fn provider_type(&self) -> &str {
        "outage"
    }
    async fn health_check(&self) -> AppResult<bool> {
        Ok(false)
    }
    async fn write(&self, locator: &str, data: Bytes) -> AppResult<()> {
        self.inner.write(locator, data).await
    }
    async fn read_bytes(&self, locator: &str) -> AppResult<Bytes> {
        self.inner.read_bytes(locator).await
    }
    async fn delete(&self, _locator: &str) -> AppResult<()> {
        Err(AppError::storage("connection refused"))
    }
    async fn exists(&self, locator: &str) -> AppResult<bool> {
        self.inner.exists(locator).await
    }
}

#[tokio::test]
async fn test_subtree_delete_survives_blob_outage() {
    let blobs = MemoryStorageProvider::new();
    let app = TestApp::with_storage(
        Arc::new(BlobOutage {
            inner: blobs.clone(),
        }),
        blobs,
    );
    let a = app.folder("A", None).await;
    let b = app.folder("B", Some(&a)).await;
    app.file("a.pdf", Some(&a)).await;
    app.file("b.pdf", Some(&b)).await;

    let report = app.library.delete_subtree(a.id, app.owner).await.unwrap();

    assert_eq!(report.summary(), "deleted 2 of 2 folders, deleted 2 of 2 files");
    assert!(!report.is_complete());
    assert!(
        report
            .files
            .items
            .iter()
            .all(|i| matches!(i.status, DeletionStatus::MetadataOnly { .. }))
    );
    assert_eq!(app.store.folder_count().await, 0);
    assert_eq!(app.store.file_count().await, 0);
    assert_eq!(app.blobs.len().await, 2);
}

#[tokio::test]
async fn test_file_moves_follow_folder_moves() {
    let app = TestApp::new();
    let a = app.folder("A", None).await;
    let b = app.folder("B", None).await;
    let one = app.file("one.pdf", None).await;
    let two = app.file("two.pdf", None).await;

    let report = app
        .library
        .files()
        .move_files(&[one.id, two.id], app.owner, Some(a.id))
        .await
        .unwrap();
    assert!(report.is_complete());

    app.library
        .folders()
        .move_folder(a.id, app.owner, Some(b.id))
        .await
        .unwrap();

    let listed = app.library.files().list_by_folder(a.id, app.owner).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(
        app.library.breadcrumbs().resolve(a.id, app.owner).await.unwrap(),
        vec!["B", "A"]
    );
    let one = FileStore::find_by_id(app.store.as_ref(), one.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(one.folder_id, Some(a.id));
}
