//! Core traits defined in `libris-core` and implemented by other crates.

pub mod storage;

pub use storage::StorageProvider;
