//! Projection view stores and the cache mutation protocol.
//!
//! A *projection store* is an in-memory, paginated, sorted slice of a logical
//! collection corresponding to one open UI view. This crate provides:
//!
//! - `sort` - The comparator used for sorted insertion
//! - `store` - A single view store (ordered rows + pagination cursor)
//! - `registry` - The keyed registry of all stores for one collection,
//!   with the broadcast insert/patch/remove mutation protocol
//! - `detail` - The single-entity detail cache
//!
//! Mutations are applied only *after* a successful remote write, with the
//! authoritative persisted row. A failed write skips the cache mutation
//! entirely, so visible state never diverges from last known good.

pub mod detail;
pub mod registry;
pub mod sort;
pub mod store;

#[cfg(test)]
mod store_props;

pub use detail::DetailCache;
pub use registry::{ViewKey, ViewRegistry};
pub use sort::{SortConfig, SortDirection, SortKey, compare};
pub use store::{PageCursor, Projected, ViewStore};
