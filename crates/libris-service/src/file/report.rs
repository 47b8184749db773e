//! Per-item outcome reports for bulk file operations.

use serde::Serialize;
use uuid::Uuid;

use libris_core::error::{AppError, ErrorKind};
use libris_entity::file::File;

/// Outcome of deleting one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeletionStatus {
    /// Metadata record and blob are both gone.
    Deleted,
    /// The metadata record is gone but the blob could not be deleted.
    MetadataOnly {
        /// Why the blob delete failed.
        reason: String,
    },
    /// The metadata record could not be deleted; nothing was removed.
    Failed {
        /// Why the metadata delete failed.
        reason: String,
    },
}

impl DeletionStatus {
    /// Whether the file's metadata record was removed.
    pub fn is_removed(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// One file of a deletion sweep.
#[derive(Debug, Clone, Serialize)]
pub struct FileDeletion {
    /// The file the sweep reached.
    pub file_id: Uuid,
    /// Folder the file was in.
    pub folder_id: Option<Uuid>,
    /// Locator of the file's blob.
    pub storage_path: String,
    /// What happened to it.
    pub status: DeletionStatus,
}

/// Result of a best-effort file deletion sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileDeletionReport {
    /// One entry per file, in sweep order.
    pub items: Vec<FileDeletion>,
}

impl FileDeletionReport {
    /// Files whose metadata record was removed, whatever happened to the blob.
    pub fn removed(&self) -> u64 {
        self.items.iter().filter(|i| i.status.is_removed()).count() as u64
    }

    /// Files the sweep tried to delete.
    pub fn attempted(&self) -> u64 {
        self.items.len() as u64
    }

    /// Files that are still present.
    pub fn failed(&self) -> impl Iterator<Item = &FileDeletion> {
        self.items
            .iter()
            .filter(|i| matches!(i.status, DeletionStatus::Failed { .. }))
    }

    /// Files removed from metadata whose blob was left behind.
    pub fn orphaned_blobs(&self) -> impl Iterator<Item = &FileDeletion> {
        self.items
            .iter()
            .filter(|i| matches!(i.status, DeletionStatus::MetadataOnly { .. }))
    }

    /// Whether every file and blob was removed.
    pub fn is_complete(&self) -> bool {
        self.items
            .iter()
            .all(|i| i.status == DeletionStatus::Deleted)
    }

    /// Append the items of another sweep.
    pub fn merge(&mut self, other: FileDeletionReport) {
        self.items.extend(other.items);
    }

    /// Human-readable summary, e.g. `deleted 3 of 4 files`.
    pub fn summary(&self) -> String {
        format!("deleted {} of {} files", self.removed(), self.attempted())
    }
}

/// A file that could not be moved.
#[derive(Debug, Clone, Serialize)]
pub struct MoveFailure {
    /// The file that stayed where it was.
    pub file_id: Uuid,
    /// Error category.
    pub kind: ErrorKind,
    /// Error message.
    pub message: String,
}

/// Result of moving several files independently.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkMoveReport {
    /// Files now in the target folder.
    pub moved: Vec<File>,
    /// Files that could not be moved.
    pub failed: Vec<MoveFailure>,
}

impl BulkMoveReport {
    pub(crate) fn record_failure(&mut self, file_id: Uuid, error: AppError) {
        self.failed.push(MoveFailure {
            file_id,
            kind: error.kind,
            message: error.message,
        });
    }

    /// Whether every requested file was moved.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Human-readable summary, e.g. `moved 2 of 3 files`.
    pub fn summary(&self) -> String {
        format!(
            "moved {} of {} files",
            self.moved.len(),
            self.moved.len() + self.failed.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(status: DeletionStatus) -> FileDeletion {
        FileDeletion {
            file_id: Uuid::new_v4(),
            folder_id: None,
            storage_path: "blobs/x".to_string(),
            status,
        }
    }

    #[test]
    fn test_deletion_report_counts() {
        let mut report = FileDeletionReport {
            items: vec![item(DeletionStatus::Deleted)],
        };
        report.merge(FileDeletionReport {
            items: vec![
                item(DeletionStatus::MetadataOnly {
                    reason: "timeout".to_string(),
                }),
                item(DeletionStatus::Failed {
                    reason: "locked".to_string(),
                }),
            ],
        });

        assert_eq!(report.removed(), 2);
        assert_eq!(report.attempted(), 3);
        assert_eq!(report.failed().count(), 1);
        assert_eq!(report.orphaned_blobs().count(), 1);
        assert!(!report.is_complete());
        assert_eq!(report.summary(), "deleted 2 of 3 files");
    }

    #[test]
    fn test_empty_report_is_complete() {
        let report = FileDeletionReport::default();
        assert!(report.is_complete());
        assert_eq!(report.summary(), "deleted 0 of 0 files");
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let json = serde_json::to_value(DeletionStatus::MetadataOnly {
            reason: "gone".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "metadata_only");
        assert_eq!(json["reason"], "gone");
    }
}
