//! Facade wiring the namespace services over one set of stores.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use libris_core::config::NamespaceConfig;
use libris_core::result::AppResult;
use libris_core::traits::storage::StorageProvider;
use libris_database::store::{FileStore, FolderStore};

use crate::access::owned_folder;
use crate::file::{FileAssociationService, FileDeletionReport};
use crate::folder::tree::descendants;
use crate::folder::{BreadcrumbResolver, FolderService, TreeService};
use crate::lock::OwnerLocks;

/// Result of deleting a folder subtree with its files.
#[derive(Debug, Clone, Serialize)]
pub struct SubtreeDeletionReport {
    /// Folders in the subtree, including its root.
    pub folders_total: u64,
    /// Folder records removed.
    pub folders_removed: u64,
    /// Folders kept because some file in them (or below them) survived.
    pub retained_folders: Vec<Uuid>,
    /// Per-file outcomes.
    pub files: FileDeletionReport,
}

impl SubtreeDeletionReport {
    /// Whether the whole subtree and every blob is gone.
    pub fn is_complete(&self) -> bool {
        self.retained_folders.is_empty() && self.files.is_complete()
    }

    /// Human-readable summary, e.g. `deleted 3 of 3 folders, deleted 5 of 6 files`.
    pub fn summary(&self) -> String {
        format!(
            "deleted {} of {} folders, {}",
            self.folders_removed,
            self.folders_total,
            self.files.summary()
        )
    }
}

/// All namespace services sharing one lock table.
#[derive(Debug, Clone)]
pub struct LibraryService {
    folder_store: Arc<dyn FolderStore>,
    locks: Arc<OwnerLocks>,
    folders: FolderService,
    files: FileAssociationService,
    breadcrumbs: BreadcrumbResolver,
    tree: TreeService,
}

impl LibraryService {
    /// Creates the services over the given stores.
    pub fn new(
        folder_store: Arc<dyn FolderStore>,
        file_store: Arc<dyn FileStore>,
        storage: Arc<dyn StorageProvider>,
        config: &NamespaceConfig,
    ) -> Self {
        let locks = Arc::new(OwnerLocks::new());
        Self {
            folders: FolderService::new(
                folder_store.clone(),
                file_store.clone(),
                locks.clone(),
                config,
            ),
            files: FileAssociationService::new(
                file_store.clone(),
                folder_store.clone(),
                storage,
                locks.clone(),
            ),
            breadcrumbs: BreadcrumbResolver::new(folder_store.clone()),
            tree: TreeService::new(folder_store.clone(), file_store),
            folder_store,
            locks,
        }
    }

    /// Folder tree operations.
    pub fn folders(&self) -> &FolderService {
        &self.folders
    }

    /// File placement and cleanup.
    pub fn files(&self) -> &FileAssociationService {
        &self.files
    }

    /// Breadcrumb lookups.
    pub fn breadcrumbs(&self) -> &BreadcrumbResolver {
        &self.breadcrumbs
    }

    /// Nested tree views.
    pub fn tree(&self) -> &TreeService {
        &self.tree
    }

    /// Deletes a folder, every descendant folder, and all their files.
    ///
    /// Files go first. A folder whose files could not all be removed is
    /// kept, together with its ancestors, so no surviving file points at a
    /// deleted folder. Running the call again retries whatever was kept.
    pub async fn delete_subtree(
        &self,
        folder_id: Uuid,
        owner_id: Uuid,
    ) -> AppResult<SubtreeDeletionReport> {
        let _guard = self.locks.acquire(owner_id).await;

        let root = owned_folder(self.folder_store.as_ref(), owner_id, folder_id).await?;
        let subtree = descendants(self.folder_store.as_ref(), owner_id, folder_id).await?;

        let mut files = FileDeletionReport::default();
        let mut blocked = Vec::new();
        for id in std::iter::once(folder_id).chain(subtree.iter().map(|f| f.id)) {
            let swept = self.files.sweep_folder(owner_id, id).await?;
            if swept.failed().next().is_some() {
                blocked.push(id);
            }
            files.merge(swept);
        }

        let parents: HashMap<Uuid, Option<Uuid>> =
            subtree.iter().map(|f| (f.id, f.parent_id)).collect();
        let mut retained: HashSet<Uuid> = HashSet::new();
        for id in blocked {
            let mut cursor = Some(id);
            while let Some(current) = cursor {
                if !retained.insert(current) || current == folder_id {
                    break;
                }
                cursor = parents.get(&current).copied().flatten();
            }
        }

        let mut folders_removed = 0u64;
        for id in subtree
            .iter()
            .rev()
            .map(|f| f.id)
            .chain(std::iter::once(folder_id))
        {
            if retained.contains(&id) {
                continue;
            }
            if self.folder_store.delete(id).await? {
                folders_removed += 1;
            }
        }

        let report = SubtreeDeletionReport {
            folders_total: subtree.len() as u64 + 1,
            folders_removed,
            retained_folders: std::iter::once(folder_id)
                .chain(subtree.iter().map(|f| f.id))
                .filter(|id| retained.contains(id))
                .collect(),
            files,
        };

        if report.is_complete() {
            info!(
                owner_id = %owner_id,
                folder_id = %folder_id,
                path = ?root.path,
                summary = %report.summary(),
                "Subtree deleted"
            );
        } else {
            warn!(
                owner_id = %owner_id,
                folder_id = %folder_id,
                path = ?root.path,
                retained = report.retained_folders.len(),
                summary = %report.summary(),
                "Subtree partially deleted"
            );
        }

        Ok(report)
    }
}
