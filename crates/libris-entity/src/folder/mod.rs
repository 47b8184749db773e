//! Folder domain entities.

pub mod model;
pub mod tree;

pub use model::{CreateFolder, Folder, PathUpdate};
pub use tree::FolderNode;
