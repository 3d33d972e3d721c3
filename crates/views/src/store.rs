//! A single projection view store.
//!
//! Each store holds the contiguous, page-accumulated prefix of one filtered
//! and sorted collection, exactly as one open UI view sees it. The store is
//! a plain ordered `Vec`; in-memory pages are bounded by the UI's pagination
//! size, so linear scans on patch are acceptable.

use std::cmp::Ordering;

use faktura_shared::types::{PageRequest, PageResponse};
use uuid::Uuid;

use crate::sort::{SortConfig, SortKey, compare};

/// A record that can live in projection view stores.
pub trait Projected: Clone + Send + Sync + 'static {
    /// Shallow patch type: `None` fields preserve the existing value.
    type Patch: Clone + Send + Sync;

    /// Primary key of the record.
    fn id(&self) -> Uuid;

    /// Extracts the sort key for a named field.
    ///
    /// Unknown fields must return [`SortKey::Null`]; the store still stays
    /// internally consistent, positioning is just best-effort until the
    /// next refetch.
    fn sort_key(&self, field: &str) -> SortKey;

    /// Shallow-merges a patch into the record.
    fn apply_patch(&mut self, patch: &Self::Patch);
}

/// Pagination cursor state of a view store.
#[derive(Debug, Clone)]
pub struct PageCursor {
    /// Page size the view loads with.
    pub per_page: u32,
    /// Number of contiguous pages currently absorbed.
    pub loaded_pages: u32,
    /// True once the last page has been absorbed.
    pub reached_end: bool,
}

impl PageCursor {
    fn new(per_page: u32) -> Self {
        Self {
            per_page,
            loaded_pages: 0,
            reached_end: false,
        }
    }
}

/// One projection store: ordered loaded rows plus pagination cursor.
#[derive(Debug, Clone)]
pub struct ViewStore<R: Projected> {
    rows: Vec<R>,
    sort: Option<SortConfig>,
    cursor: PageCursor,
}

impl<R: Projected> ViewStore<R> {
    /// Creates an empty store.
    ///
    /// `sort` is `None` when the view's sort configuration is not visible to
    /// the cache layer; such stores get the prepend-on-insert fallback.
    #[must_use]
    pub fn new(sort: Option<SortConfig>, per_page: u32) -> Self {
        Self {
            rows: Vec::new(),
            sort,
            cursor: PageCursor::new(per_page),
        }
    }

    /// Currently loaded rows, in view order.
    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Number of loaded rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if no rows are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The store's sort configuration, if known.
    #[must_use]
    pub fn sort(&self) -> Option<&SortConfig> {
        self.sort.as_ref()
    }

    /// The pagination cursor.
    #[must_use]
    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    /// True if a record with this primary key is loaded.
    #[must_use]
    pub fn contains(&self, id: Uuid) -> bool {
        self.rows.iter().any(|row| row.id() == id)
    }

    /// Request for the next unloaded page, or `None` once exhausted.
    #[must_use]
    pub fn next_page_request(&self) -> Option<PageRequest> {
        if self.cursor.reached_end {
            return None;
        }
        Some(PageRequest {
            page: self.cursor.loaded_pages + 1,
            per_page: self.cursor.per_page,
        })
    }

    /// Absorbs a fetched page into the store.
    ///
    /// Rows already present by primary key are skipped: a refetch may
    /// overlap rows that optimistic inserts already placed.
    pub fn extend_page(&mut self, page: PageResponse<R>) {
        self.cursor.loaded_pages = page.meta.page;
        self.cursor.reached_end = page.meta.is_last();

        for row in page.data {
            if !self.contains(row.id()) {
                self.rows.push(row);
            }
        }
    }

    /// Replaces the store contents with fresh network truth.
    ///
    /// This is the reconciliation step that corrects any best-effort
    /// positioning left behind by optimistic inserts.
    pub fn refresh(&mut self, page: PageResponse<R>) {
        self.rows.clear();
        self.extend_page(page);
    }

    /// Inserts a record at its sorted position.
    ///
    /// No-op if the primary key is already present (racing
    /// optimistic-then-confirmed flows must not duplicate rows). Without a
    /// known sort configuration the record is prepended and left for the
    /// next refetch to reposition.
    ///
    /// Returns true if the record was inserted.
    pub fn insert(&mut self, record: &R) -> bool {
        if self.contains(record.id()) {
            return false;
        }

        match &self.sort {
            Some(config) => {
                let key = record.sort_key(&config.field);
                // First index whose row sorts strictly after the new record;
                // equal keys stay ahead of it, keeping insertion order stable.
                let index = self.rows.partition_point(|row| {
                    compare(&row.sort_key(&config.field), &key, config.direction)
                        != Ordering::Greater
                });
                self.rows.insert(index, record.clone());
            }
            None => self.rows.insert(0, record.clone()),
        }
        true
    }

    /// Shallow-merges a patch into the record with this primary key.
    ///
    /// The row keeps its position even if a sorted field changed; the next
    /// refetch corrects ordering drift.
    ///
    /// Returns true if a record was found and patched.
    pub fn patch(&mut self, id: Uuid, patch: &R::Patch) -> bool {
        match self.rows.iter_mut().find(|row| row.id() == id) {
            Some(row) => {
                row.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    /// Removes the record with this primary key.
    ///
    /// Returns true if a record was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id() != id);
        self.rows.len() != before
    }
}
