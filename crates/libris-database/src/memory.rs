//! In-memory namespace store.
//!
//! Folders and files share one lock, so a batched path write is atomic
//! with respect to every other store call. Used by the test suites and by
//! the CLI when no database is wanted.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use libris_core::error::AppError;
use libris_core::result::AppResult;
use libris_entity::file::{CreateFile, File};
use libris_entity::folder::{CreateFolder, Folder, PathUpdate};

use crate::store::{FileStore, FolderStore};

#[derive(Debug, Default)]
struct NamespaceState {
    folders: HashMap<Uuid, Folder>,
    files: HashMap<Uuid, File>,
}

/// Folder and file store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryNamespaceStore {
    state: Arc<RwLock<NamespaceState>>,
}

impl MemoryNamespaceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of folder records currently held.
    pub async fn folder_count(&self) -> usize {
        self.state.read().await.folders.len()
    }

    /// Number of file records currently held.
    pub async fn file_count(&self) -> usize {
        self.state.read().await.files.len()
    }
}

#[async_trait]
impl FolderStore for MemoryNamespaceStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        Ok(self.state.read().await.folders.get(&id).cloned())
    }

    async fn find_children(
        &self,
        owner_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> AppResult<Vec<Folder>> {
        let state = self.state.read().await;
        let mut children: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| f.owner_id == owner_id && f.parent_id == parent_id)
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn count_children(&self, owner_id: Uuid, parent_id: Uuid) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .folders
            .values()
            .filter(|f| f.owner_id == owner_id && f.parent_id == Some(parent_id))
            .count() as u64)
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        if let Some(parent_id) = data.parent_id {
            if !state.folders.contains_key(&parent_id) {
                return Err(AppError::not_found("Parent folder not found"));
            }
        }

        let now = Utc::now();
        let folder = Folder {
            id: Uuid::now_v7(),
            owner_id: data.owner_id,
            parent_id: data.parent_id,
            name: data.name.clone(),
            path: data.path.clone(),
            created_at: now,
            updated_at: now,
        };
        state.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn update(&self, folder: &Folder) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        let stored = state
            .folders
            .get_mut(&folder.id)
            .ok_or_else(|| AppError::not_found(format!("Folder {} not found", folder.id)))?;
        stored.name = folder.name.clone();
        stored.parent_id = folder.parent_id;
        stored.path = folder.path.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn update_paths(&self, updates: &[PathUpdate]) -> AppResult<()> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        for update in updates {
            if let Some(folder) = state.folders.get_mut(&update.folder_id) {
                folder.path = update.path.clone();
                folder.updated_at = now;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.folders.values().any(|f| f.parent_id == Some(id)) {
            return Err(AppError::non_empty_folder(format!(
                "Folder {id} still has subfolders"
            )));
        }
        Ok(state.folders.remove(&id).is_some())
    }
}

#[async_trait]
impl FileStore for MemoryNamespaceStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        Ok(self.state.read().await.files.get(&id).cloned())
    }

    async fn find_by_folder(
        &self,
        owner_id: Uuid,
        folder_id: Option<Uuid>,
    ) -> AppResult<Vec<File>> {
        let state = self.state.read().await;
        let mut files: Vec<File> = state
            .files
            .values()
            .filter(|f| f.owner_id == owner_id && f.folder_id == folder_id)
            .cloned()
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    async fn find_orphaned(&self, owner_id: Uuid) -> AppResult<Vec<File>> {
        let state = self.state.read().await;
        let mut files: Vec<File> = state
            .files
            .values()
            .filter(|f| f.owner_id == owner_id)
            .filter(|f| f.folder_id.is_some_and(|id| !state.folders.contains_key(&id)))
            .cloned()
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    async fn count_in_folder(&self, owner_id: Uuid, folder_id: Uuid) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .files
            .values()
            .filter(|f| f.owner_id == owner_id && f.folder_id == Some(folder_id))
            .count() as u64)
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let now = Utc::now();
        let file = File {
            id: Uuid::now_v7(),
            owner_id: data.owner_id,
            folder_id: data.folder_id,
            name: data.name.clone(),
            storage_path: data.storage_path.clone(),
            mime_type: data.mime_type.clone(),
            size_bytes: data.size_bytes,
            created_at: now,
            updated_at: now,
        };
        self.state.write().await.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn set_folder(&self, file_id: Uuid, folder_id: Option<Uuid>) -> AppResult<File> {
        let mut state = self.state.write().await;
        let file = state
            .files
            .get_mut(&file_id)
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;
        file.folder_id = folder_id;
        file.updated_at = Utc::now();
        Ok(file.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.state.write().await.files.remove(&id).is_some())
    }
}
