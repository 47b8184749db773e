//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An uploaded file or generated note attached to the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The owning principal.
    pub owner_id: Uuid,
    /// The folder containing this file (null for the root).
    pub folder_id: Option<Uuid>,
    /// The file name (including extension).
    pub name: String,
    /// Locator of the backing blob in the blob store.
    pub storage_path: String,
    /// MIME type of the file.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub size_bytes: i64,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Check if the file sits at the root of its owner's library.
    pub fn is_at_root(&self) -> bool {
        self.folder_id.is_none()
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file owner.
    pub owner_id: Uuid,
    /// The folder to place the file in (None for root).
    pub folder_id: Option<Uuid>,
    /// The file name.
    pub name: String,
    /// Locator of the backing blob.
    pub storage_path: String,
    /// MIME type.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub size_bytes: i64,
}
