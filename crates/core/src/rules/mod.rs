//! Money and allocation rules.
//!
//! Pure, stateless functions shared by the allocation engine and the
//! payment/credit ledger. Every derived monetary figure in the system goes
//! through these three functions, which is what keeps cross-field rounding
//! drift out of edited invoices.

pub mod error;
pub mod service;

#[cfg(test)]
mod props;

pub use error::RulesError;
pub use service::{BillingRules, Reconciled, VatBreakdown};
