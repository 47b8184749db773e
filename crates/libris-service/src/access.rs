//! Existence and ownership checks shared by every service.
//!
//! A record that exists under another owner is reported as `Unauthorized`,
//! never as `NotFound`, so callers can tell the two apart.

use uuid::Uuid;

use libris_core::error::AppError;
use libris_core::result::AppResult;
use libris_database::store::{FileStore, FolderStore};
use libris_entity::file::File;
use libris_entity::folder::Folder;

/// Load a folder and check that `owner_id` owns it.
pub async fn owned_folder(
    store: &dyn FolderStore,
    owner_id: Uuid,
    folder_id: Uuid,
) -> AppResult<Folder> {
    let folder = store
        .find_by_id(folder_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;

    if folder.owner_id != owner_id {
        return Err(AppError::unauthorized(format!(
            "Folder {folder_id} belongs to another owner"
        )));
    }
    Ok(folder)
}

/// Load a file and check that `owner_id` owns it.
pub async fn owned_file(store: &dyn FileStore, owner_id: Uuid, file_id: Uuid) -> AppResult<File> {
    let file = store
        .find_by_id(file_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

    if file.owner_id != owner_id {
        return Err(AppError::unauthorized(format!(
            "File {file_id} belongs to another owner"
        )));
    }
    Ok(file)
}
