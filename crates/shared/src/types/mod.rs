//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{BALANCE_EPSILON, Currency, is_effectively_zero, round2};
pub use pagination::{PageMeta, PageRequest, PageResponse};
