//! Order-to-invoice allocation.
//!
//! The engine is a pure planner: it turns a user's order selection into an
//! [`types::AllocationPlan`] without touching persistence. The service
//! commits a plan through the repository port and only then applies the
//! result to the view caches.

pub mod engine;
pub mod error;
pub mod service;
pub mod types;

pub use engine::AllocationEngine;
pub use error::AllocationError;
pub use service::AllocationService;
