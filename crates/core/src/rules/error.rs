//! Rule evaluation errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from the pure money rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    /// Requested or base amount is negative. Rejected, never clamped to
    /// zero, so user mistakes are not silently hidden.
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// VAT rate is outside the valid percentage range.
    #[error("VAT rate must be between 0 and 100: {0}")]
    InvalidVatRate(Decimal),
}
