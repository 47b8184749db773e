//! File-to-folder association: moves, listings, and cascading deletes.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use libris_core::result::AppResult;
use libris_core::traits::storage::StorageProvider;
use libris_database::store::{FileStore, FolderStore};
use libris_entity::file::File;

use crate::access::{owned_file, owned_folder};
use crate::file::report::{BulkMoveReport, DeletionStatus, FileDeletion, FileDeletionReport};
use crate::folder::tree::descendants;
use crate::lock::OwnerLocks;

/// Moves, lists, and deletes the files of an owner's folders.
#[derive(Debug, Clone)]
pub struct FileAssociationService {
    file_store: Arc<dyn FileStore>,
    folder_store: Arc<dyn FolderStore>,
    storage: Arc<dyn StorageProvider>,
    locks: Arc<OwnerLocks>,
}

impl FileAssociationService {
    /// Creates a new file association service.
    pub fn new(
        file_store: Arc<dyn FileStore>,
        folder_store: Arc<dyn FolderStore>,
        storage: Arc<dyn StorageProvider>,
        locks: Arc<OwnerLocks>,
    ) -> Self {
        Self {
            file_store,
            folder_store,
            storage,
            locks,
        }
    }

    /// Moves a file into `target_folder_id`, or to the root when `None`.
    pub async fn move_file(
        &self,
        file_id: Uuid,
        owner_id: Uuid,
        target_folder_id: Option<Uuid>,
    ) -> AppResult<File> {
        let _guard = self.locks.acquire(owner_id).await;
        if let Some(folder_id) = target_folder_id {
            owned_folder(self.folder_store.as_ref(), owner_id, folder_id).await?;
        }
        self.relocate(file_id, owner_id, target_folder_id).await
    }

    /// Moves each file independently.
    ///
    /// The target folder is checked once before anything moves; a bad
    /// target rejects the whole call. Per-file failures are collected in the
    /// report and do not stop the remaining moves.
    pub async fn move_files(
        &self,
        file_ids: &[Uuid],
        owner_id: Uuid,
        target_folder_id: Option<Uuid>,
    ) -> AppResult<BulkMoveReport> {
        let _guard = self.locks.acquire(owner_id).await;
        if let Some(folder_id) = target_folder_id {
            owned_folder(self.folder_store.as_ref(), owner_id, folder_id).await?;
        }

        let mut report = BulkMoveReport::default();
        for &file_id in file_ids {
            match self.relocate(file_id, owner_id, target_folder_id).await {
                Ok(file) => report.moved.push(file),
                Err(e) => {
                    warn!(file_id = %file_id, error = %e, "File move failed");
                    report.record_failure(file_id, e);
                }
            }
        }

        info!(
            owner_id = %owner_id,
            target = ?target_folder_id,
            moved = report.moved.len(),
            failed = report.failed.len(),
            "Bulk file move finished"
        );

        Ok(report)
    }

    /// Lists the files directly inside a folder.
    pub async fn list_by_folder(&self, folder_id: Uuid, owner_id: Uuid) -> AppResult<Vec<File>> {
        owned_folder(self.folder_store.as_ref(), owner_id, folder_id).await?;
        self.file_store.find_by_folder(owner_id, Some(folder_id)).await
    }

    /// Lists the owner's root-level files.
    pub async fn list_root(&self, owner_id: Uuid) -> AppResult<Vec<File>> {
        self.file_store.find_by_folder(owner_id, None).await
    }

    /// Deletes the files directly inside a folder, best effort.
    ///
    /// The folder record itself may already be gone; the owner's files that
    /// still reference it are swept anyway.
    pub async fn delete_files_in_folder(
        &self,
        folder_id: Uuid,
        owner_id: Uuid,
    ) -> AppResult<FileDeletionReport> {
        let _guard = self.locks.acquire(owner_id).await;
        self.check_sweep_target(folder_id, owner_id).await?;

        let report = self.sweep_folder(owner_id, folder_id).await?;
        info!(
            owner_id = %owner_id,
            folder_id = %folder_id,
            removed = report.removed(),
            attempted = report.attempted(),
            "Folder files deleted"
        );
        Ok(report)
    }

    /// Deletes the files of a folder and of every descendant folder.
    ///
    /// When the folder record is already gone its descendants can no longer
    /// be walked, so every file of the owner that points at a missing folder
    /// is swept instead.
    pub async fn delete_files_in_folder_recursively(
        &self,
        folder_id: Uuid,
        owner_id: Uuid,
    ) -> AppResult<FileDeletionReport> {
        let _guard = self.locks.acquire(owner_id).await;

        if !self.check_sweep_target(folder_id, owner_id).await? {
            let orphans = self.file_store.find_orphaned(owner_id).await?;
            let report = self.sweep(orphans).await;
            info!(
                owner_id = %owner_id,
                folder_id = %folder_id,
                summary = %report.summary(),
                "Orphaned files deleted"
            );
            return Ok(report);
        }

        let subtree = descendants(self.folder_store.as_ref(), owner_id, folder_id).await?;
        let mut report = self.sweep_folder(owner_id, folder_id).await?;
        for folder in &subtree {
            report.merge(self.sweep_folder(owner_id, folder.id).await?);
        }

        info!(
            owner_id = %owner_id,
            folder_id = %folder_id,
            folders = subtree.len() + 1,
            summary = %report.summary(),
            "Subtree files deleted"
        );
        Ok(report)
    }

    /// Delete every file of one folder without taking the owner lock.
    ///
    /// Listing failures abort; per-file failures are recorded and skipped.
    pub(crate) async fn sweep_folder(
        &self,
        owner_id: Uuid,
        folder_id: Uuid,
    ) -> AppResult<FileDeletionReport> {
        let files = self.file_store.find_by_folder(owner_id, Some(folder_id)).await?;
        Ok(self.sweep(files).await)
    }

    async fn sweep(&self, files: Vec<File>) -> FileDeletionReport {
        let mut report = FileDeletionReport {
            items: Vec::with_capacity(files.len()),
        };
        for file in files {
            report.items.push(self.delete_one(file).await);
        }
        report
    }

    async fn delete_one(&self, file: File) -> FileDeletion {
        let status = match self.file_store.delete(file.id).await {
            Err(e) => {
                warn!(file_id = %file.id, error = %e, "File metadata delete failed, skipping");
                DeletionStatus::Failed {
                    reason: e.to_string(),
                }
            }
            Ok(_) => match self.storage.delete(&file.storage_path).await {
                Ok(()) => {
                    debug!(file_id = %file.id, "File deleted");
                    DeletionStatus::Deleted
                }
                Err(e) => {
                    warn!(
                        file_id = %file.id,
                        storage_path = %file.storage_path,
                        error = %e,
                        "Blob delete failed, blob left orphaned"
                    );
                    DeletionStatus::MetadataOnly {
                        reason: e.to_string(),
                    }
                }
            },
        };

        FileDeletion {
            file_id: file.id,
            folder_id: file.folder_id,
            storage_path: file.storage_path,
            status,
        }
    }

    async fn relocate(
        &self,
        file_id: Uuid,
        owner_id: Uuid,
        target_folder_id: Option<Uuid>,
    ) -> AppResult<File> {
        let file = owned_file(self.file_store.as_ref(), owner_id, file_id).await?;
        if file.folder_id == target_folder_id {
            return Ok(file);
        }
        let moved = self.file_store.set_folder(file_id, target_folder_id).await?;
        debug!(
            file_id = %file_id,
            from = ?file.folder_id,
            to = ?target_folder_id,
            "File moved"
        );
        Ok(moved)
    }

    /// A sweep target may be missing, but never another owner's folder.
    /// Returns whether the folder record still exists.
    async fn check_sweep_target(&self, folder_id: Uuid, owner_id: Uuid) -> AppResult<bool> {
        match owned_folder(self.folder_store.as_ref(), owner_id, folder_id).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind == libris_core::error::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
