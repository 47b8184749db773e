//! Store traits for folder and file metadata.
//!
//! Every query is owner-scoped except point lookups by id; callers compare
//! the returned `owner_id` themselves so that a foreign record can be told
//! apart from a missing one.

use async_trait::async_trait;
use uuid::Uuid;

use libris_core::result::AppResult;
use libris_entity::file::{CreateFile, File};
use libris_entity::folder::{CreateFolder, Folder, PathUpdate};

/// Folder records of the namespace.
#[async_trait]
pub trait FolderStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a folder by ID, regardless of owner.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>>;

    /// List the direct children of `parent_id` owned by `owner_id`, ordered
    /// by name. `None` lists the owner's root-level folders.
    async fn find_children(&self, owner_id: Uuid, parent_id: Option<Uuid>)
    -> AppResult<Vec<Folder>>;

    /// Count the direct child folders of a folder.
    async fn count_children(&self, owner_id: Uuid, parent_id: Uuid) -> AppResult<u64>;

    /// Create a new folder.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Persist `name`, `parent_id`, and `path` of an existing folder.
    async fn update(&self, folder: &Folder) -> AppResult<Folder>;

    /// Rewrite the paths of several folders in one atomic batch.
    ///
    /// Either every update is applied or none is. Updates naming a folder
    /// that no longer exists are skipped.
    async fn update_paths(&self, updates: &[PathUpdate]) -> AppResult<()>;

    /// Delete a folder record. Returns `true` if a record was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// File records and their folder association.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a file by ID, regardless of owner.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>>;

    /// List the files directly in `folder_id` owned by `owner_id`, ordered
    /// by name. `None` lists the owner's root-level files.
    async fn find_by_folder(&self, owner_id: Uuid, folder_id: Option<Uuid>)
    -> AppResult<Vec<File>>;

    /// List the owner's files whose `folder_id` names a folder that no
    /// longer exists, ordered by name.
    async fn find_orphaned(&self, owner_id: Uuid) -> AppResult<Vec<File>>;

    /// Count the files directly in a folder.
    async fn count_in_folder(&self, owner_id: Uuid, folder_id: Uuid) -> AppResult<u64>;

    /// Create a new file record.
    async fn create(&self, data: &CreateFile) -> AppResult<File>;

    /// Point a file at a different folder (`None` for the root).
    async fn set_folder(&self, file_id: Uuid, folder_id: Option<Uuid>) -> AppResult<File>;

    /// Delete a file record. Returns `true` if a record was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}
