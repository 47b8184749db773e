//! File association services: moves, listings, and cascading deletes.

pub mod report;
pub mod service;

pub use report::{BulkMoveReport, DeletionStatus, FileDeletion, FileDeletionReport, MoveFailure};
pub use service::FileAssociationService;
