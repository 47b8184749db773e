//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use libris_core::config::NamespaceConfig;
use libris_core::traits::storage::StorageProvider;
use libris_database::store::{FileStore, FolderStore};
use libris_database::MemoryNamespaceStore;
use libris_entity::file::{CreateFile, File};
use libris_entity::folder::Folder;
use libris_service::LibraryService;
use libris_storage::MemoryStorageProvider;

/// Test application context
pub struct TestApp {
    /// The services under test
    pub library: LibraryService,
    /// Metadata store for direct queries
    pub store: Arc<MemoryNamespaceStore>,
    /// Blob store for direct queries
    pub blobs: MemoryStorageProvider,
    /// Owner used by default
    pub owner: Uuid,
}

impl TestApp {
    /// Create a new test application over empty in-memory stores
    pub fn new() -> Self {
        let blobs = MemoryStorageProvider::new();
        Self::with_storage(Arc::new(blobs.clone()), blobs)
    }

    /// Create a test application whose services delete blobs through `storage`
    pub fn with_storage(storage: Arc<dyn StorageProvider>, blobs: MemoryStorageProvider) -> Self {
        let store = Arc::new(MemoryNamespaceStore::new());
        let library = LibraryService::new(
            store.clone(),
            store.clone(),
            storage,
            &NamespaceConfig::default(),
        );
        Self {
            library,
            store,
            blobs,
            owner: Uuid::new_v4(),
        }
    }

    /// Create a folder for the default owner
    pub async fn folder(&self, name: &str, parent: Option<&Folder>) -> Folder {
        self.library
            .folders()
            .create(self.owner, name, parent.map(|p| p.id))
            .await
            .expect("Failed to create folder")
    }

    /// Ingest a file with a blob for the default owner
    pub async fn file(&self, name: &str, folder: Option<&Folder>) -> File {
        let storage_path = format!("{}/{}", self.owner, Uuid::new_v4());
        self.blobs
            .write(&storage_path, Bytes::from(name.to_string()))
            .await
            .expect("Failed to write blob");
        FileStore::create(
            self.store.as_ref(),
            &CreateFile {
                owner_id: self.owner,
                folder_id: folder.map(|f| f.id),
                name: name.to_string(),
                storage_path,
                mime_type: None,
                size_bytes: name.len() as i64,
            },
        )
        .await
        .expect("Failed to create file")
    }

    /// Reload a folder straight from the store
    pub async fn reload(&self, folder: &Folder) -> Option<Folder> {
        FolderStore::find_by_id(self.store.as_ref(), folder.id)
            .await
            .expect("Failed to load folder")
    }

    /// Stored path of a folder
    pub async fn path_of(&self, folder: &Folder) -> Vec<String> {
        self.reload(folder).await.expect("Folder is gone").path
    }

    /// Check that every stored folder's path is its parent's path plus its name
    pub async fn assert_paths_consistent(&self) {
        let mut frontier: Vec<(Option<Uuid>, Vec<String>)> = vec![(None, Vec::new())];
        while let Some((parent_id, parent_path)) = frontier.pop() {
            let children = self
                .store
                .find_children(self.owner, parent_id)
                .await
                .expect("Failed to list folders");
            for child in children {
                let mut expected = parent_path.clone();
                expected.push(child.name.clone());
                assert_eq!(child.path, expected, "stale path on folder {}", child.id);
                frontier.push((Some(child.id), expected));
            }
        }
    }
}
