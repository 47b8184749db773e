//! Folder tree services.

pub mod breadcrumb;
pub mod propagator;
pub mod service;
pub mod tree;

pub use breadcrumb::BreadcrumbResolver;
pub use propagator::{PathPropagator, PropagationSummary};
pub use service::FolderService;
pub use tree::TreeService;
