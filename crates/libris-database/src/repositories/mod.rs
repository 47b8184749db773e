//! PostgreSQL repository implementations of the namespace stores.

pub mod file;
pub mod folder;

pub use file::FileRepository;
pub use folder::FolderRepository;
