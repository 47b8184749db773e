//! # libris-service
//!
//! The namespace manager. Keeps each owner's folder tree consistent:
//! materialized paths are rewritten level by level after a rename or move,
//! moves that would create a cycle are rejected, and cascading deletes
//! coordinate the metadata store with the blob store.
//!
//! Services follow constructor injection: stores, the blob store, and the
//! per-owner lock table are handed in as `Arc`s.

pub mod access;
pub mod file;
pub mod folder;
pub mod library;
pub mod lock;

pub use file::{BulkMoveReport, DeletionStatus, FileAssociationService, FileDeletionReport};
pub use folder::{BreadcrumbResolver, FolderService, PathPropagator, PropagationSummary, TreeService};
pub use library::{LibraryService, SubtreeDeletionReport};
pub use lock::{OwnerGuard, OwnerLocks};
