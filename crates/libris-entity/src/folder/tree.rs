//! Folder tree structures for hierarchical display.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A node in a folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
    /// Materialized path.
    pub path: Vec<String>,
    /// Number of direct child folders.
    pub child_count: u64,
    /// Number of files directly in this folder.
    pub file_count: u64,
    /// Child folder nodes, ordered by name.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Total number of folders in this subtree, including this one.
    pub fn total_folders(&self) -> u64 {
        1 + self.children.iter().map(FolderNode::total_folders).sum::<u64>()
    }

    /// Total number of files in this subtree.
    pub fn total_files(&self) -> u64 {
        self.file_count + self.children.iter().map(FolderNode::total_files).sum::<u64>()
    }
}
