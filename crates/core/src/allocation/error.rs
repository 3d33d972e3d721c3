//! Allocation errors.

use faktura_shared::error::AppError;
use faktura_shared::types::id::OrderId;
use faktura_shared::types::money::Currency;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::ports::RepositoryError;
use crate::rules::RulesError;

/// Errors from planning or committing an allocation.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// A selected order is denominated in a different currency than the
    /// invoice. Allocations never convert.
    #[error("Currency mismatch: invoice is {expected}, order is {got}")]
    CurrencyMismatch {
        /// Invoice currency.
        expected: Currency,
        /// Offending order currency.
        got: Currency,
    },

    /// Persisted state no longer has room for the planned amount.
    #[error("Order {order_id} has {remaining} remaining, cannot bill {requested}")]
    InsufficientRemaining {
        /// Order that ran out of room.
        order_id: OrderId,
        /// Amount the plan wanted to bill.
        requested: Decimal,
        /// What the order actually has left.
        remaining: Decimal,
    },

    /// Nothing to bill: every selection clamped to zero and no header
    /// override supplied a positive amount.
    #[error("No billable allocation selected")]
    NoAllocationSelected,

    /// A money rule rejected an input.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// The persistence port failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::CurrencyMismatch { .. }
            | AllocationError::NoAllocationSelected
            | AllocationError::Rules(_) => Self::Validation(err.to_string()),
            AllocationError::InsufficientRemaining { .. } => Self::BusinessRule(err.to_string()),
            AllocationError::Repository(inner) => Self::Remote(inner.to_string()),
        }
    }
}
