//! Blob store provider implementations.

pub mod local;
pub mod memory;

pub use local::LocalStorageProvider;
pub use memory::MemoryStorageProvider;
