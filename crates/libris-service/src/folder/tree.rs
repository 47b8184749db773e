//! Subtree traversal and folder tree building.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use libris_core::error::AppError;
use libris_core::result::AppResult;
use libris_database::store::{FileStore, FolderStore};
use libris_entity::folder::{Folder, FolderNode};

use crate::access::owned_folder;

/// Collect every descendant of `root_id` owned by `owner_id`,
/// breadth-first, excluding the root itself.
///
/// Parents always precede their children in the result, so iterating it in
/// reverse visits children before parents. `root_id` does not need to
/// exist; a deleted folder simply has no children left to report.
pub async fn descendants(
    store: &dyn FolderStore,
    owner_id: Uuid,
    root_id: Uuid,
) -> AppResult<Vec<Folder>> {
    let mut visited: HashSet<Uuid> = HashSet::from([root_id]);
    let mut result = Vec::new();
    let mut parents = vec![root_id];

    while !parents.is_empty() {
        let mut next = Vec::new();
        for parent_id in parents {
            for child in store.find_children(owner_id, Some(parent_id)).await? {
                if !visited.insert(child.id) {
                    return Err(AppError::internal(format!(
                        "Folder {} is reachable twice below {root_id}; the parent graph has a cycle",
                        child.id
                    )));
                }
                next.push(child.id);
                result.push(child);
            }
        }
        parents = next;
    }

    Ok(result)
}

/// Builds nested folder trees for display.
#[derive(Debug, Clone)]
pub struct TreeService {
    folder_store: Arc<dyn FolderStore>,
    file_store: Arc<dyn FileStore>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(folder_store: Arc<dyn FolderStore>, file_store: Arc<dyn FileStore>) -> Self {
        Self {
            folder_store,
            file_store,
        }
    }

    /// Builds the tree rooted at `folder_id`.
    pub async fn get_tree(&self, folder_id: Uuid, owner_id: Uuid) -> AppResult<FolderNode> {
        let root = owned_folder(self.folder_store.as_ref(), owner_id, folder_id).await?;
        let all = descendants(self.folder_store.as_ref(), owner_id, folder_id).await?;
        self.build(root, all).await
    }

    /// Builds one tree per root-level folder of the owner.
    pub async fn get_library_tree(&self, owner_id: Uuid) -> AppResult<Vec<FolderNode>> {
        let roots = self.folder_store.find_children(owner_id, None).await?;
        let mut trees = Vec::with_capacity(roots.len());
        for root in roots {
            let all = descendants(self.folder_store.as_ref(), owner_id, root.id).await?;
            trees.push(self.build(root, all).await?);
        }
        Ok(trees)
    }

    async fn build(&self, root: Folder, all: Vec<Folder>) -> AppResult<FolderNode> {
        let mut file_counts = HashMap::with_capacity(all.len() + 1);
        for folder in std::iter::once(&root).chain(all.iter()) {
            let count = self
                .file_store
                .count_in_folder(folder.owner_id, folder.id)
                .await?;
            file_counts.insert(folder.id, count);
        }

        let mut by_parent: HashMap<Uuid, Vec<Folder>> = HashMap::new();
        for folder in all {
            if let Some(parent_id) = folder.parent_id {
                by_parent.entry(parent_id).or_default().push(folder);
            }
        }

        Ok(assemble(root, &mut by_parent, &file_counts))
    }
}

fn assemble(
    folder: Folder,
    by_parent: &mut HashMap<Uuid, Vec<Folder>>,
    file_counts: &HashMap<Uuid, u64>,
) -> FolderNode {
    let children: Vec<FolderNode> = by_parent
        .remove(&folder.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| assemble(child, by_parent, file_counts))
        .collect();

    FolderNode {
        id: folder.id,
        name: folder.name,
        path: folder.path,
        child_count: children.len() as u64,
        file_count: file_counts.get(&folder.id).copied().unwrap_or(0),
        children,
    }
}
