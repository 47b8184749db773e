//! Per-owner serialization of structural mutations.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per owner.
///
/// Renames, moves, and deletes of the same owner run one at a time, so a
/// path propagation never observes a tree another request is rewriting.
/// Different owners never contend. An owner's entry lives only while some
/// request holds or waits for it.
#[derive(Debug, Default)]
pub struct OwnerLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl OwnerLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `owner_id`'s tree.
    pub async fn acquire(&self, owner_id: Uuid) -> OwnerGuard<'_> {
        let lock = self
            .locks
            .entry(owner_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        OwnerGuard {
            guard: Some(lock.lock_owned().await),
            locks: self,
            owner_id,
        }
    }

    /// Number of owners currently holding or waiting for a lock.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no owner holds or waits for a lock.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive access to one owner's tree. Released on drop.
#[derive(Debug)]
pub struct OwnerGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    locks: &'a OwnerLocks,
    owner_id: Uuid,
}

impl Drop for OwnerGuard<'_> {
    fn drop(&mut self) {
        // The guard holds a clone of the mutex Arc; release it first.
        self.guard.take();
        // Only the table's own reference left means nobody is waiting.
        self.locks
            .locks
            .remove_if(&self.owner_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
