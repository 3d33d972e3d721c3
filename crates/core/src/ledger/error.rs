//! Ledger errors.

use faktura_shared::error::AppError;
use faktura_shared::types::id::{CreditNoteId, InvoiceId};
use faktura_shared::types::money::Currency;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::ports::RepositoryError;

/// Errors from applying payments or credit notes.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The allocations of one payment would sum past the payment itself.
    /// Unlike invoice overpayment, this is a hard error: money that was
    /// never received cannot be applied.
    #[error("Allocations would exceed payment amount {payment_amount}: attempted {attempted}")]
    ExceedsPaymentAmount {
        /// Full amount of the payment.
        payment_amount: Decimal,
        /// Sum the allocations would reach.
        attempted: Decimal,
    },

    /// Applied or credited amounts must be strictly positive.
    #[error("Amount must be positive: {0}")]
    NonPositiveAmount(Decimal),

    /// Payment and invoice are denominated in different currencies.
    #[error("Currency mismatch: invoice is {expected}, payment is {got}")]
    CurrencyMismatch {
        /// Invoice currency.
        expected: Currency,
        /// Payment currency.
        got: Currency,
    },

    /// The invoice the operation targets does not exist.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    /// Voiding a credit note that is already void.
    #[error("Credit note already void: {0}")]
    CreditNoteAlreadyVoid(CreditNoteId),

    /// The persistence port failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NonPositiveAmount(_) | LedgerError::CurrencyMismatch { .. } => {
                Self::Validation(err.to_string())
            }
            LedgerError::ExceedsPaymentAmount { .. }
            | LedgerError::CreditNoteAlreadyVoid(_) => Self::BusinessRule(err.to_string()),
            LedgerError::InvoiceNotFound(_) => Self::NotFound(err.to_string()),
            LedgerError::Repository(inner) => Self::Remote(inner.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_app_error_mapping() {
        let cap: AppError = LedgerError::ExceedsPaymentAmount {
            payment_amount: dec!(100.00),
            attempted: dec!(150.00),
        }
        .into();
        assert_eq!(cap.error_code(), "BUSINESS_RULE_VIOLATION");
        assert!(!cap.is_retryable());

        let missing: AppError = LedgerError::InvoiceNotFound(InvoiceId::new()).into();
        assert_eq!(missing.error_code(), "NOT_FOUND");

        let remote: AppError =
            LedgerError::Repository(RepositoryError::Remote("503".to_string())).into();
        assert!(remote.is_retryable());
    }
}
