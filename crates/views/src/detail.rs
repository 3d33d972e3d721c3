//! Single-entity detail cache.
//!
//! Backs the detail pane of each entity type: `id -> record`, always patched
//! or replaced directly with the authoritative post-write row. No positional
//! bookkeeping is needed here, unlike the list stores.

use std::sync::Arc;

use moka::sync::Cache;
use uuid::Uuid;

use crate::store::Projected;

/// Cache of fully-hydrated single records, keyed by primary key.
///
/// Unbounded by default: entries live for the UI session. A capacity bound
/// can be configured for long-lived embeddings.
#[derive(Clone)]
pub struct DetailCache<R: Projected> {
    cache: Cache<Uuid, Arc<R>>,
}

impl<R: Projected> DetailCache<R> {
    /// Creates an unbounded detail cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().build(),
        }
    }

    /// Creates a detail cache with a maximum entry capacity.
    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_capacity).build(),
        }
    }

    /// Returns the cached record, if hydrated.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<Arc<R>> {
        self.cache.get(&id)
    }

    /// Stores or replaces the record.
    pub fn put(&self, record: R) {
        self.cache.insert(record.id(), Arc::new(record));
    }

    /// Shallow-merges a patch into the cached record, if present.
    ///
    /// Returns true if a cached record was patched.
    pub fn patch(&self, id: Uuid, patch: &R::Patch) -> bool {
        match self.cache.get(&id) {
            Some(current) => {
                let mut updated = (*current).clone();
                updated.apply_patch(patch);
                self.cache.insert(id, Arc::new(updated));
                true
            }
            None => false,
        }
    }

    /// Drops the cached record.
    pub fn remove(&self, id: Uuid) {
        self.cache.invalidate(&id);
    }

    /// Drops every cached record.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Number of cached records.
    ///
    /// Moka maintains this lazily; call after `run_pending_tasks` when an
    /// exact count matters (tests).
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs cache maintenance tasks (exactness for tests).
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl<R: Projected> Default for DetailCache<R> {
    fn default() -> Self {
        Self::new()
    }
}
