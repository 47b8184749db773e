//! Folder create, rename, move, and delete with ownership and cycle checks.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use libris_core::config::NamespaceConfig;
use libris_core::error::AppError;
use libris_core::result::AppResult;
use libris_database::store::{FileStore, FolderStore};
use libris_entity::folder::{CreateFolder, Folder};

use crate::access::owned_folder;
use crate::folder::propagator::{PathPropagator, PropagationSummary};
use crate::folder::tree::descendants;
use crate::lock::OwnerLocks;

/// Manages the folder tree of each owner.
///
/// Every mutating operation holds the owner's lock from its first check to
/// the end of path propagation.
#[derive(Debug, Clone)]
pub struct FolderService {
    folder_store: Arc<dyn FolderStore>,
    file_store: Arc<dyn FileStore>,
    propagator: PathPropagator,
    locks: Arc<OwnerLocks>,
    max_name_length: usize,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folder_store: Arc<dyn FolderStore>,
        file_store: Arc<dyn FileStore>,
        locks: Arc<OwnerLocks>,
        config: &NamespaceConfig,
    ) -> Self {
        Self {
            propagator: PathPropagator::new(folder_store.clone(), config.max_batch_size),
            folder_store,
            file_store,
            locks,
            max_name_length: config.max_name_length,
        }
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: Uuid, owner_id: Uuid) -> AppResult<Folder> {
        owned_folder(self.folder_store.as_ref(), owner_id, folder_id).await
    }

    /// Lists the owner's root-level folders.
    pub async fn list_root(&self, owner_id: Uuid) -> AppResult<Vec<Folder>> {
        self.folder_store.find_children(owner_id, None).await
    }

    /// Lists the direct subfolders of a folder.
    pub async fn list_children(&self, folder_id: Uuid, owner_id: Uuid) -> AppResult<Vec<Folder>> {
        self.get_folder(folder_id, owner_id).await?;
        self.folder_store
            .find_children(owner_id, Some(folder_id))
            .await
    }

    /// Creates a folder under `parent_id`, or at the root when `None`.
    pub async fn create(
        &self,
        owner_id: Uuid,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        let name = self.validate_name(name)?;
        let _guard = self.locks.acquire(owner_id).await;

        let path = match parent_id {
            Some(parent_id) => self.get_folder(parent_id, owner_id).await?.child_path(&name),
            None => vec![name.clone()],
        };

        let folder = self
            .folder_store
            .create(&CreateFolder {
                owner_id,
                parent_id,
                name,
                path,
            })
            .await?;

        info!(
            owner_id = %owner_id,
            folder_id = %folder.id,
            path = ?folder.path,
            "Folder created"
        );

        Ok(folder)
    }

    /// Renames a folder and rewrites the paths below it.
    pub async fn rename(&self, folder_id: Uuid, owner_id: Uuid, new_name: &str) -> AppResult<Folder> {
        let new_name = self.validate_name(new_name)?;
        let _guard = self.locks.acquire(owner_id).await;

        let mut folder = self.get_folder(folder_id, owner_id).await?;
        let old_name = std::mem::replace(&mut folder.name, new_name);
        match folder.path.last_mut() {
            Some(last) => *last = folder.name.clone(),
            None => folder.path.push(folder.name.clone()),
        }

        let folder = self.folder_store.update(&folder).await?;
        let summary = self.propagate(&folder).await?;

        info!(
            owner_id = %owner_id,
            folder_id = %folder_id,
            old_name = %old_name,
            new_name = %folder.name,
            descendants = summary.folders_visited,
            "Folder renamed"
        );

        Ok(folder)
    }

    /// Moves a folder under `new_parent_id`, or to the root when `None`.
    ///
    /// Rejects moving a folder into itself or into any of its descendants.
    pub async fn move_folder(
        &self,
        folder_id: Uuid,
        owner_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        let _guard = self.locks.acquire(owner_id).await;

        let mut folder = self.get_folder(folder_id, owner_id).await?;

        folder.path = match new_parent_id {
            Some(parent_id) if parent_id == folder_id => {
                return Err(AppError::cycle("Cannot move a folder into itself"));
            }
            Some(parent_id) => {
                let target = self.get_folder(parent_id, owner_id).await?;
                self.ensure_not_descendant(folder_id, &target).await?;
                target.child_path(&folder.name)
            }
            None => vec![folder.name.clone()],
        };
        folder.parent_id = new_parent_id;

        let folder = self.folder_store.update(&folder).await?;
        let summary = self.propagate(&folder).await?;

        info!(
            owner_id = %owner_id,
            folder_id = %folder_id,
            new_parent = ?new_parent_id,
            descendants = summary.folders_visited,
            "Folder moved"
        );

        Ok(folder)
    }

    /// Deletes an empty folder.
    ///
    /// Fails with `NonEmptyFolder` while the folder holds any file or
    /// subfolder; nothing is changed in that case.
    pub async fn delete(&self, folder_id: Uuid, owner_id: Uuid) -> AppResult<()> {
        let _guard = self.locks.acquire(owner_id).await;

        let folder = self.get_folder(folder_id, owner_id).await?;

        let subfolders = self
            .folder_store
            .count_children(owner_id, folder_id)
            .await?;
        let files = self.file_store.count_in_folder(owner_id, folder_id).await?;
        if subfolders > 0 || files > 0 {
            return Err(AppError::non_empty_folder(format!(
                "Folder '{}' contains {subfolders} subfolder(s) and {files} file(s)",
                folder.name
            )));
        }

        self.folder_store.delete(folder_id).await?;

        info!(
            owner_id = %owner_id,
            folder_id = %folder_id,
            path = ?folder.path,
            "Folder deleted"
        );

        Ok(())
    }

    /// Deletes a folder and every descendant folder, children first.
    ///
    /// Files are left untouched; use
    /// [`LibraryService::delete_subtree`](crate::LibraryService::delete_subtree)
    /// to remove both. Returns the number of folder records removed.
    pub async fn delete_recursively(&self, folder_id: Uuid, owner_id: Uuid) -> AppResult<u64> {
        let _guard = self.locks.acquire(owner_id).await;

        let folder = self.get_folder(folder_id, owner_id).await?;
        let subtree = descendants(self.folder_store.as_ref(), owner_id, folder_id).await?;

        let mut removed = 0u64;
        for id in subtree.iter().rev().map(|f| f.id).chain(std::iter::once(folder_id)) {
            if self.folder_store.delete(id).await? {
                removed += 1;
            }
        }

        info!(
            owner_id = %owner_id,
            folder_id = %folder_id,
            path = ?folder.path,
            removed,
            "Folder subtree deleted"
        );

        Ok(removed)
    }

    /// Recomputes a folder's path from its parent and re-runs propagation
    /// below it.
    ///
    /// This is the retry entry point after a rename or move whose
    /// propagation failed part of the way down.
    pub async fn repair_paths(
        &self,
        folder_id: Uuid,
        owner_id: Uuid,
    ) -> AppResult<PropagationSummary> {
        let _guard = self.locks.acquire(owner_id).await;

        let mut folder = self.get_folder(folder_id, owner_id).await?;
        let expected = match folder.parent_id {
            Some(parent_id) => self.get_folder(parent_id, owner_id).await?.child_path(&folder.name),
            None => vec![folder.name.clone()],
        };

        if folder.path != expected {
            warn!(
                folder_id = %folder_id,
                stored = ?folder.path,
                expected = ?expected,
                "Repairing stale folder path"
            );
            folder.path = expected;
            folder = self.folder_store.update(&folder).await?;
        }

        let summary = self.propagator.propagate(&folder).await?;
        info!(
            owner_id = %owner_id,
            folder_id = %folder_id,
            rewritten = summary.paths_rewritten,
            "Folder paths repaired"
        );
        Ok(summary)
    }

    async fn propagate(&self, folder: &Folder) -> AppResult<PropagationSummary> {
        self.propagator.propagate(folder).await.inspect_err(|e| {
            warn!(
                folder_id = %folder.id,
                error = %e,
                "Path propagation stopped part way; descendants may be stale until repaired"
            );
        })
    }

    /// Walk the ancestor chain of `target` up to the root and fail if
    /// `folder_id` is on it.
    async fn ensure_not_descendant(&self, folder_id: Uuid, target: &Folder) -> AppResult<()> {
        let mut seen = HashSet::from([target.id]);
        let mut cursor = target.parent_id;

        while let Some(id) = cursor {
            if id == folder_id {
                return Err(AppError::cycle(
                    "Cannot move a folder into one of its descendants",
                ));
            }
            if !seen.insert(id) {
                return Err(AppError::internal(format!(
                    "Ancestor chain of folder {} loops at {id}",
                    target.id
                )));
            }
            cursor = match self.folder_store.find_by_id(id).await? {
                Some(ancestor) => ancestor.parent_id,
                None => None,
            };
        }

        Ok(())
    }

    fn validate_name(&self, name: &str) -> AppResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        if name.chars().count() > self.max_name_length {
            return Err(AppError::validation(format!(
                "Folder name exceeds {} characters",
                self.max_name_length
            )));
        }
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libris_core::error::ErrorKind;
    use libris_database::MemoryNamespaceStore;
    use libris_entity::file::CreateFile;

    fn service(store: &Arc<MemoryNamespaceStore>) -> FolderService {
        FolderService::new(
            store.clone(),
            store.clone(),
            Arc::new(OwnerLocks::new()),
            &NamespaceConfig::default(),
        )
    }

    async fn path_of(store: &MemoryNamespaceStore, id: Uuid) -> Vec<String> {
        FolderStore::find_by_id(store, id).await.unwrap().unwrap().path
    }

    #[tokio::test]
    async fn test_create_builds_path_from_parent() {
        let store = Arc::new(MemoryNamespaceStore::new());
        let folders = service(&store);
        let owner = Uuid::new_v4();

        let sem = folders.create(owner, "Semester 1", None).await.unwrap();
        let bio = folders.create(owner, "  Biology ", Some(sem.id)).await.unwrap();

        assert_eq!(sem.path, vec!["Semester 1"]);
        assert_eq!(bio.name, "Biology");
        assert_eq!(bio.path, vec!["Semester 1", "Biology"]);
        assert_eq!(bio.parent_id, Some(sem.id));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_names() {
        let store = Arc::new(MemoryNamespaceStore::new());
        let folders = FolderService::new(
            store.clone(),
            store.clone(),
            Arc::new(OwnerLocks::new()),
            &NamespaceConfig {
                max_name_length: 4,
                ..NamespaceConfig::default()
            },
        );
        let owner = Uuid::new_v4();

        let err = folders.create(owner, "   ", None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = folders.create(owner, "Chemistry", None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(store.folder_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_under_foreign_or_missing_parent() {
        let store = Arc::new(MemoryNamespaceStore::new());
        let folders = service(&store);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let alices = folders.create(alice, "Private", None).await.unwrap();

        let err = folders.create(bob, "Sneaky", Some(alices.id)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        let err = folders
            .create(bob, "Lost", Some(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_rename_updates_descendant_prefixes_only() {
        let store = Arc::new(MemoryNamespaceStore::new());
        let folders = service(&store);
        let owner = Uuid::new_v4();
        let a = folders.create(owner, "A", None).await.unwrap();
        let b = folders.create(owner, "B", Some(a.id)).await.unwrap();
        let c = folders.create(owner, "C", Some(b.id)).await.unwrap();

        let renamed = folders.rename(b.id, owner, "Bee").await.unwrap();

        assert_eq!(renamed.path, vec!["A", "Bee"]);
        assert_eq!(path_of(&store, a.id).await, vec!["A"]);
        assert_eq!(path_of(&store, c.id).await, vec!["A", "Bee", "C"]);
    }

    #[tokio::test]
    async fn test_rename_foreign_folder_is_unauthorized() {
        let store = Arc::new(MemoryNamespaceStore::new());
        let folders = service(&store);
        let a = folders.create(Uuid::new_v4(), "A", None).await.unwrap();

        let err = folders.rename(a.id, Uuid::new_v4(), "Mine").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(path_of(&store, a.id).await, vec!["A"]);
    }

    #[tokio::test]
    async fn test_move_to_root_and_back() {
        let store = Arc::new(MemoryNamespaceStore::new());
        let folders = service(&store);
        let owner = Uuid::new_v4();
        let a = folders.create(owner, "A", None).await.unwrap();
        let b = folders.create(owner, "B", Some(a.id)).await.unwrap();
        let c = folders.create(owner, "C", Some(b.id)).await.unwrap();

        let moved = folders.move_folder(b.id, owner, None).await.unwrap();
        assert!(moved.is_root());
        assert_eq!(path_of(&store, c.id).await, vec!["B", "C"]);

        folders.move_folder(b.id, owner, Some(a.id)).await.unwrap();
        assert_eq!(path_of(&store, c.id).await, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_move_into_self_or_descendant_is_a_cycle() {
        let store = Arc::new(MemoryNamespaceStore::new());
        let folders = service(&store);
        let owner = Uuid::new_v4();
        let a = folders.create(owner, "A", None).await.unwrap();
        let b = folders.create(owner, "B", Some(a.id)).await.unwrap();
        let c = folders.create(owner, "C", Some(b.id)).await.unwrap();

        let err = folders.move_folder(a.id, owner, Some(a.id)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cycle);
        let err = folders.move_folder(a.id, owner, Some(c.id)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cycle);

        let a = folders.get_folder(a.id, owner).await.unwrap();
        assert!(a.is_root());
        assert_eq!(path_of(&store, c.id).await, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_move_under_foreign_folder_is_unauthorized() {
        let store = Arc::new(MemoryNamespaceStore::new());
        let folders = service(&store);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let mine = folders.create(alice, "Mine", None).await.unwrap();
        let theirs = folders.create(bob, "Theirs", None).await.unwrap();

        let err = folders
            .move_folder(mine.id, alice, Some(theirs.id))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_strict_delete_refuses_non_empty_folders() {
        let store = Arc::new(MemoryNamespaceStore::new());
        let folders = service(&store);
        let owner = Uuid::new_v4();
        let a = folders.create(owner, "A", None).await.unwrap();
        let b = folders.create(owner, "B", Some(a.id)).await.unwrap();
        FileStore::create(
            store.as_ref(),
            &CreateFile {
                owner_id: owner,
                folder_id: Some(b.id),
                name: "essay.docx".to_string(),
                storage_path: "blobs/essay".to_string(),
                mime_type: None,
                size_bytes: 10,
            },
        )
        .await
        .unwrap();

        let err = folders.delete(a.id, owner).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NonEmptyFolder);
        let err = folders.delete(b.id, owner).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NonEmptyFolder);
        assert_eq!(store.folder_count().await, 2);
    }

    #[tokio::test]
    async fn test_strict_delete_of_empty_folder() {
        let store = Arc::new(MemoryNamespaceStore::new());
        let folders = service(&store);
        let owner = Uuid::new_v4();
        let a = folders.create(owner, "A", None).await.unwrap();

        folders.delete(a.id, owner).await.unwrap();
        let err = folders.delete(a.id, owner).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_recursively_counts_folders() {
        let store = Arc::new(MemoryNamespaceStore::new());
        let folders = service(&store);
        let owner = Uuid::new_v4();
        let a = folders.create(owner, "A", None).await.unwrap();
        let b = folders.create(owner, "B", Some(a.id)).await.unwrap();
        folders.create(owner, "C", Some(b.id)).await.unwrap();
        folders.create(owner, "D", Some(a.id)).await.unwrap();
        let keep = folders.create(owner, "Keep", None).await.unwrap();

        assert_eq!(folders.delete_recursively(a.id, owner).await.unwrap(), 4);
        let roots = folders.list_root(owner).await.unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id, keep.id);
    }

    #[tokio::test]
    async fn test_repair_fixes_stale_paths() {
        let store = Arc::new(MemoryNamespaceStore::new());
        let folders = service(&store);
        let owner = Uuid::new_v4();
        let a = folders.create(owner, "A", None).await.unwrap();
        let b = folders.create(owner, "B", Some(a.id)).await.unwrap();
        let c = folders.create(owner, "C", Some(b.id)).await.unwrap();

        // Simulate a rename of A whose propagation never ran.
        let mut stale = a.clone();
        stale.name = "A2".to_string();
        stale.path = vec!["A2".to_string()];
        store.update(&stale).await.unwrap();

        let summary = folders.repair_paths(a.id, owner).await.unwrap();
        assert_eq!(summary.paths_rewritten, 2);
        assert_eq!(path_of(&store, b.id).await, vec!["A2", "B"]);
        assert_eq!(path_of(&store, c.id).await, vec!["A2", "B", "C"]);

        let again = folders.repair_paths(a.id, owner).await.unwrap();
        assert_eq!(again.paths_rewritten, 0);
    }
}
