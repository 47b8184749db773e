//! # libris-database
//!
//! The metadata store behind the Libris namespace. [`store`] defines the
//! folder and file store traits the service layer depends on; they are
//! implemented by the PostgreSQL repositories and by an in-memory store.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryNamespaceStore;
pub use store::{FileStore, FolderStore};
