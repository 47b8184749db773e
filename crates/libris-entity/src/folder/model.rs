//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A folder in an owner's library tree.
///
/// `path` is the materialized list of names from the root down to and
/// including this folder, so `path.last()` is always `name` and a root
/// folder's path is `[name]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// The owning principal. Never changes after creation.
    pub owner_id: Uuid,
    /// Parent folder ID (null for folders directly under the root).
    pub parent_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Materialized path, e.g. `["Semester 1", "Biology"]`.
    pub path: Vec<String>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last renamed or moved.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this folder sits directly under the root.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Depth below the root (0 for root-level folders).
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// The path a child named `name` of this folder must carry.
    pub fn child_path(&self, name: &str) -> Vec<String> {
        child_path(&self.path, name)
    }
}

/// Append `name` to a parent path.
pub fn child_path(parent_path: &[String], name: &str) -> Vec<String> {
    let mut path = Vec::with_capacity(parent_path.len() + 1);
    path.extend_from_slice(parent_path);
    path.push(name.to_string());
    path
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// The folder owner.
    pub owner_id: Uuid,
    /// Parent folder (None for root).
    pub parent_id: Option<Uuid>,
    /// Folder name.
    pub name: String,
    /// Full materialized path.
    pub path: Vec<String>,
}

/// One entry of a batched path write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathUpdate {
    /// The folder whose path is rewritten.
    pub folder_id: Uuid,
    /// The path to persist.
    pub path: Vec<String>,
}
