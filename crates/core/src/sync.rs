//! Post-write cache application.
//!
//! Every service mutation follows the same ordering: the repository write
//! completes first, then the committed rows are applied to the caches, then
//! the notifier fires. A failed write therefore never leaves a phantom row
//! in any view, and subscribers always observe caches at least as fresh as
//! the event they received.

use faktura_shared::config::CacheConfig;
use faktura_views::detail::DetailCache;
use faktura_views::registry::ViewRegistry;
use faktura_views::store::Projected;
use uuid::Uuid;

use crate::billing::types::{CreditNote, Invoice, Order};

/// The paired list-and-detail caches of one collection.
///
/// List stores and the detail cache are updated together so a screen showing
/// both never sees them disagree about the same row.
pub struct CollectionCache<R: Projected> {
    views: ViewRegistry<R>,
    detail: DetailCache<R>,
}

impl<R: Projected> Clone for CollectionCache<R> {
    fn clone(&self) -> Self {
        Self {
            views: self.views.clone(),
            detail: self.detail.clone(),
        }
    }
}

impl<R: Projected> CollectionCache<R> {
    /// Creates the caches for a named collection.
    #[must_use]
    pub fn new(collection: &'static str) -> Self {
        Self {
            views: ViewRegistry::new(collection),
            detail: DetailCache::new(),
        }
    }

    /// Creates the caches with a bounded detail cache.
    #[must_use]
    pub fn with_detail_capacity(collection: &'static str, capacity: u64) -> Self {
        Self {
            views: ViewRegistry::new(collection),
            detail: DetailCache::with_capacity(capacity),
        }
    }

    /// The list-store registry, for view registration and reads.
    #[must_use]
    pub fn views(&self) -> &ViewRegistry<R> {
        &self.views
    }

    /// The detail cache, for detail-pane reads.
    #[must_use]
    pub fn detail(&self) -> &DetailCache<R> {
        &self.detail
    }

    /// Applies a committed creation: sorted insert into every list store,
    /// full row into the detail cache.
    pub fn apply_insert(&self, record: &R) {
        self.views.apply_insert(record);
        self.detail.put(record.clone());
    }

    /// Applies a committed update as a shallow patch everywhere the row is
    /// loaded.
    pub fn apply_patch(&self, id: Uuid, patch: &R::Patch) {
        self.views.apply_patch(id, patch);
        self.detail.patch(id, patch);
    }

    /// Replaces the row with authoritative truth: removed and re-inserted
    /// in the list stores so its sorted position is recomputed, replaced in
    /// the detail cache.
    pub fn apply_replace(&self, record: &R) {
        self.views.apply_remove(record.id());
        self.views.apply_insert(record);
        self.detail.put(record.clone());
    }

    /// Applies a committed deletion everywhere.
    pub fn apply_remove(&self, id: Uuid) {
        self.views.apply_remove(id);
        self.detail.remove(id);
    }
}

/// The client-side caches of every billing collection.
///
/// One instance exists per session; services hold clones (shared handles,
/// not copies) injected at construction.
#[derive(Clone)]
pub struct CacheLayer {
    /// Invoice list stores and detail cache.
    pub invoices: CollectionCache<Invoice>,
    /// Order list stores and detail cache.
    pub orders: CollectionCache<Order>,
    /// Credit note list stores and detail cache.
    pub credit_notes: CollectionCache<CreditNote>,
}

impl CacheLayer {
    /// Creates an empty cache layer with unbounded detail caches.
    #[must_use]
    pub fn new() -> Self {
        Self {
            invoices: CollectionCache::new("invoices"),
            orders: CollectionCache::new("orders"),
            credit_notes: CollectionCache::new("credit_notes"),
        }
    }

    /// Creates a cache layer honoring the configured detail capacity.
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        match config.detail_capacity {
            Some(capacity) => Self {
                invoices: CollectionCache::with_detail_capacity("invoices", capacity),
                orders: CollectionCache::with_detail_capacity("orders", capacity),
                credit_notes: CollectionCache::with_detail_capacity("credit_notes", capacity),
            },
            None => Self::new(),
        }
    }
}

impl Default for CacheLayer {
    fn default() -> Self {
        Self::new()
    }
}
