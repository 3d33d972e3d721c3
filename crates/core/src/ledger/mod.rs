//! Payment and credit ledger.
//!
//! Maintains the derived settlement fields on each invoice (`amount_paid`,
//! the credited totals, `balance_due`, and the paid/partially-paid status)
//! as payment allocations and credit notes come and go. The arithmetic is
//! in `compute`, free of I/O; the service wires it to the repository and
//! the caches.

pub mod compute;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod props;

pub use error::LedgerError;
pub use service::LedgerService;
pub use types::LedgerTotals;
