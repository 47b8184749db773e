//! Folder tree limits.

use serde::{Deserialize, Serialize};

/// Limits applied by the folder and path-propagation services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// Maximum folder name length in characters.
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Maximum number of records in one batched metadata write.
    ///
    /// A tree level with more children than this is persisted in several
    /// consecutive batches.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            max_name_length: default_max_name_length(),
            max_batch_size: default_max_batch_size(),
        }
    }
}

fn default_max_name_length() -> usize {
    255
}

fn default_max_batch_size() -> usize {
    500
}
