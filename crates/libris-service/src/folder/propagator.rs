//! Materialized-path propagation.
//!
//! After a folder's path changes, every descendant's path has to be
//! rewritten. The walk is breadth-first over an explicit frontier: all
//! folders of one tree level are rewritten in one batched write (split
//! only when the level exceeds the store's batch limit), then the next
//! level is loaded from the store.
//!
//! Levels are not atomic with respect to each other. When a batch fails,
//! the levels above it are already rewritten and everything below is
//! stale; running [`PathPropagator::propagate`] again from the same folder
//! converges, because each child's path is derived from its parent's
//! expected path rather than from what is stored.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use libris_core::error::AppError;
use libris_core::result::AppResult;
use libris_database::store::FolderStore;
use libris_entity::folder::model::child_path;
use libris_entity::folder::{Folder, PathUpdate};

/// Outcome of one propagation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropagationSummary {
    /// Tree levels below the changed folder that were visited.
    pub levels: usize,
    /// Descendant folders visited.
    pub folders_visited: u64,
    /// Descendant folders whose stored path was stale and got rewritten.
    pub paths_rewritten: u64,
}

/// Rewrites descendant paths after a folder's path changed.
#[derive(Debug, Clone)]
pub struct PathPropagator {
    folder_store: Arc<dyn FolderStore>,
    max_batch_size: usize,
}

impl PathPropagator {
    /// Creates a new propagator writing at most `max_batch_size` records
    /// per batch.
    pub fn new(folder_store: Arc<dyn FolderStore>, max_batch_size: usize) -> Self {
        Self {
            folder_store,
            max_batch_size: max_batch_size.max(1),
        }
    }

    /// Make every descendant of `folder` consistent with `folder.path`.
    ///
    /// `folder` must carry the path that was just persisted for it.
    pub async fn propagate(&self, folder: &Folder) -> AppResult<PropagationSummary> {
        let mut summary = PropagationSummary::default();
        let mut visited: HashSet<Uuid> = HashSet::from([folder.id]);
        let mut frontier: Vec<(Uuid, Vec<String>)> = vec![(folder.id, folder.path.clone())];

        while !frontier.is_empty() {
            let mut next = Vec::new();
            let mut updates = Vec::new();

            for (parent_id, parent_path) in &frontier {
                let children = self
                    .folder_store
                    .find_children(folder.owner_id, Some(*parent_id))
                    .await?;

                for child in children {
                    if !visited.insert(child.id) {
                        return Err(AppError::internal(format!(
                            "Folder {} is reachable twice below {}; the parent graph has a cycle",
                            child.id, folder.id
                        )));
                    }

                    let expected = child_path(parent_path, &child.name);
                    if child.path != expected {
                        updates.push(PathUpdate {
                            folder_id: child.id,
                            path: expected.clone(),
                        });
                    }
                    next.push((child.id, expected));
                }
            }

            if next.is_empty() {
                break;
            }

            for batch in updates.chunks(self.max_batch_size) {
                self.folder_store.update_paths(batch).await?;
            }

            summary.levels += 1;
            summary.folders_visited += next.len() as u64;
            summary.paths_rewritten += updates.len() as u64;
            debug!(
                folder_id = %folder.id,
                level = summary.levels,
                rewritten = updates.len(),
                "Propagated folder paths"
            );

            frontier = next;
        }

        Ok(summary)
    }
}
