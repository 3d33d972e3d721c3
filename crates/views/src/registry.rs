//! The keyed registry of projection stores for one collection.
//!
//! One registry instance exists per logical collection (invoices, orders,
//! credit notes). Every open view of that collection registers a store under
//! a `(filter, sort)` key; mutations broadcast to every registered store so
//! that a change made on one screen is visible on all others without a
//! network round trip.
//!
//! The registry is a shared handle (cheaply cloneable) that call sites are
//! handed explicitly; there is no ambient global. Stores have no eviction
//! policy: they live for the UI session and are removed when their owning
//! view unmounts.

use std::sync::Arc;

use dashmap::DashMap;
use faktura_shared::types::PageResponse;
use uuid::Uuid;

use crate::sort::SortConfig;
use crate::store::{Projected, ViewStore};

/// Registry key of one view: serialized filter plus sort configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewKey {
    /// Stable hash/serialization of the view's filter configuration.
    pub filter_hash: String,
    /// Stable key of the view's sort configuration (empty when unknown).
    pub sort_hash: String,
}

impl ViewKey {
    /// Builds a key from a filter hash and an optional sort configuration.
    #[must_use]
    pub fn new(filter_hash: impl Into<String>, sort: Option<&SortConfig>) -> Self {
        Self {
            filter_hash: filter_hash.into(),
            sort_hash: sort.map(SortConfig::key).unwrap_or_default(),
        }
    }
}

/// All projection stores of one logical collection.
pub struct ViewRegistry<R: Projected> {
    collection: &'static str,
    stores: Arc<DashMap<ViewKey, ViewStore<R>>>,
}

impl<R: Projected> Clone for ViewRegistry<R> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection,
            stores: Arc::clone(&self.stores),
        }
    }
}

impl<R: Projected> ViewRegistry<R> {
    /// Creates an empty registry for a named collection.
    #[must_use]
    pub fn new(collection: &'static str) -> Self {
        Self {
            collection,
            stores: Arc::new(DashMap::new()),
        }
    }

    /// Collection name this registry serves.
    #[must_use]
    pub fn collection(&self) -> &'static str {
        self.collection
    }

    /// Registers a store for a view key. Idempotent: an existing store is
    /// left untouched so re-mounting a view does not drop loaded pages.
    pub fn register(&self, key: ViewKey, sort: Option<SortConfig>, per_page: u32) {
        self.stores
            .entry(key)
            .or_insert_with(|| ViewStore::new(sort, per_page));
    }

    /// Removes the store for a view key (view unmount).
    pub fn unregister(&self, key: &ViewKey) {
        self.stores.remove(key);
    }

    /// Number of registered stores.
    #[must_use]
    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    /// Reads from one store.
    pub fn read<T>(&self, key: &ViewKey, f: impl FnOnce(&ViewStore<R>) -> T) -> Option<T> {
        self.stores.get(key).map(|store| f(&store))
    }

    /// Absorbs a fetched page into one store.
    pub fn extend_page(&self, key: &ViewKey, page: PageResponse<R>) {
        if let Some(mut store) = self.stores.get_mut(key) {
            store.extend_page(page);
        }
    }

    /// Replaces one store's rows with fresh network truth.
    pub fn refresh(&self, key: &ViewKey, page: PageResponse<R>) {
        if let Some(mut store) = self.stores.get_mut(key) {
            store.refresh(page);
        }
    }

    /// Broadcast insert: places the record into every registered store at
    /// the position each store's own sort dictates.
    pub fn apply_insert(&self, record: &R) {
        let mut inserted = 0usize;
        for mut store in self.stores.iter_mut() {
            if store.insert(record) {
                inserted += 1;
            }
        }
        tracing::debug!(
            collection = self.collection,
            id = %record.id(),
            stores = inserted,
            "cache insert applied"
        );
    }

    /// Broadcast patch: shallow-merges into the record wherever it is loaded.
    pub fn apply_patch(&self, id: Uuid, patch: &R::Patch) {
        let mut patched = 0usize;
        for mut store in self.stores.iter_mut() {
            if store.patch(id, patch) {
                patched += 1;
            }
        }
        tracing::debug!(
            collection = self.collection,
            id = %id,
            stores = patched,
            "cache patch applied"
        );
    }

    /// Broadcast remove: filters the record out of every store.
    pub fn apply_remove(&self, id: Uuid) {
        let mut removed = 0usize;
        for mut store in self.stores.iter_mut() {
            if store.remove(id) {
                removed += 1;
            }
        }
        tracing::debug!(
            collection = self.collection,
            id = %id,
            stores = removed,
            "cache remove applied"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortDirection;
    use crate::store::tests::{TestRow, TestRowPatch, row};
    use rust_decimal_macros::dec;

    fn registry_with_two_views() -> (ViewRegistry<TestRow>, ViewKey, ViewKey) {
        let registry = ViewRegistry::new("invoices");

        let by_date = SortConfig::new("issued_on", SortDirection::Descending);
        let by_number = SortConfig::new("number", SortDirection::Ascending);
        let date_key = ViewKey::new("status=all", Some(&by_date));
        let number_key = ViewKey::new("status=open", Some(&by_number));

        registry.register(date_key.clone(), Some(by_date), 30);
        registry.register(number_key.clone(), Some(by_number), 30);
        (registry, date_key, number_key)
    }

    fn numbers(registry: &ViewRegistry<TestRow>, key: &ViewKey) -> Vec<String> {
        registry
            .read(key, |store| {
                store.rows().iter().map(|r| r.number.clone()).collect()
            })
            .unwrap()
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry: ViewRegistry<TestRow> = ViewRegistry::new("invoices");
        let key = ViewKey::new("status=all", None);

        registry.register(key.clone(), None, 30);
        registry.apply_insert(&row("A", 1, dec!(1)));
        registry.register(key.clone(), None, 30);

        assert_eq!(registry.store_count(), 1);
        // Re-registering did not drop the loaded row.
        assert_eq!(registry.read(&key, ViewStore::len).unwrap(), 1);
    }

    #[test]
    fn test_insert_lands_per_each_stores_own_sort() {
        // Two open stores for the same collection with different sorts:
        // the new record must land at the right index in both independently.
        let (registry, date_key, number_key) = registry_with_two_views();

        registry.apply_insert(&row("FV-002", 10, dec!(100)));
        registry.apply_insert(&row("FV-003", 5, dec!(200)));
        registry.apply_insert(&row("FV-001", 20, dec!(300)));

        assert_eq!(
            numbers(&registry, &date_key),
            vec!["FV-001", "FV-002", "FV-003"]
        );
        assert_eq!(
            numbers(&registry, &number_key),
            vec!["FV-001", "FV-002", "FV-003"]
        );

        // Different sort fields give genuinely different orders.
        registry.apply_insert(&row("FV-000", 15, dec!(50)));
        assert_eq!(
            numbers(&registry, &date_key),
            vec!["FV-001", "FV-000", "FV-002", "FV-003"]
        );
        assert_eq!(
            numbers(&registry, &number_key),
            vec!["FV-000", "FV-001", "FV-002", "FV-003"]
        );
    }

    #[test]
    fn test_double_insert_leaves_lengths_unchanged() {
        let (registry, date_key, number_key) = registry_with_two_views();
        let record = row("FV-001", 1, dec!(100));

        registry.apply_insert(&record);
        let len_date = registry.read(&date_key, ViewStore::len).unwrap();
        let len_number = registry.read(&number_key, ViewStore::len).unwrap();

        registry.apply_insert(&record);
        assert_eq!(registry.read(&date_key, ViewStore::len).unwrap(), len_date);
        assert_eq!(
            registry.read(&number_key, ViewStore::len).unwrap(),
            len_number
        );
    }

    #[test]
    fn test_patch_reaches_every_store_containing_the_record() {
        let (registry, date_key, number_key) = registry_with_two_views();
        let record = row("FV-001", 1, dec!(100));
        registry.apply_insert(&record);

        registry.apply_patch(
            record.id,
            &TestRowPatch {
                total: Some(dec!(500)),
                ..TestRowPatch::default()
            },
        );

        for key in [&date_key, &number_key] {
            let total = registry
                .read(key, |store| store.rows()[0].total)
                .unwrap();
            assert_eq!(total, dec!(500));
        }
    }

    #[test]
    fn test_remove_filters_out_of_every_store() {
        let (registry, date_key, number_key) = registry_with_two_views();
        let record = row("FV-001", 1, dec!(100));
        registry.apply_insert(&record);
        registry.apply_insert(&row("FV-002", 2, dec!(200)));

        registry.apply_remove(record.id);

        assert_eq!(numbers(&registry, &date_key), vec!["FV-002"]);
        assert_eq!(numbers(&registry, &number_key), vec!["FV-002"]);
    }

    #[test]
    fn test_unregister_drops_store() {
        let (registry, date_key, _) = registry_with_two_views();
        registry.unregister(&date_key);
        assert_eq!(registry.store_count(), 1);
        assert!(registry.read(&date_key, ViewStore::len).is_none());
    }

    #[test]
    fn test_clone_shares_underlying_stores() {
        let (registry, date_key, _) = registry_with_two_views();
        let handle = registry.clone();

        handle.apply_insert(&row("FV-001", 1, dec!(100)));
        assert_eq!(numbers(&registry, &date_key), vec!["FV-001"]);
    }
}
