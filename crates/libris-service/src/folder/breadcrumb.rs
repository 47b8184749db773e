//! Breadcrumb resolution backed by the materialized path.

use std::sync::Arc;

use uuid::Uuid;

use libris_core::result::AppResult;
use libris_database::store::FolderStore;

use crate::access::owned_folder;

/// Answers "where am I" for a folder with a single point lookup.
#[derive(Debug, Clone)]
pub struct BreadcrumbResolver {
    folder_store: Arc<dyn FolderStore>,
}

impl BreadcrumbResolver {
    /// Creates a new breadcrumb resolver.
    pub fn new(folder_store: Arc<dyn FolderStore>) -> Self {
        Self { folder_store }
    }

    /// Names from the root down to and including `folder_id`.
    pub async fn resolve(&self, folder_id: Uuid, owner_id: Uuid) -> AppResult<Vec<String>> {
        let folder = owned_folder(self.folder_store.as_ref(), owner_id, folder_id).await?;
        Ok(folder.path)
    }

    /// Like [`resolve`](Self::resolve), with `None` standing for the root,
    /// whose trail is empty.
    pub async fn resolve_current(
        &self,
        folder_id: Option<Uuid>,
        owner_id: Uuid,
    ) -> AppResult<Vec<String>> {
        match folder_id {
            Some(id) => self.resolve(id, owner_id).await,
            None => Ok(Vec::new()),
        }
    }
}
