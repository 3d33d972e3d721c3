//! Ledger inputs and derived totals.

use chrono::NaiveDate;
use faktura_shared::types::id::{InvoiceId, PaymentId};
use rust_decimal::Decimal;

use crate::billing::rows::InvoicePatch;
use crate::billing::types::InvoiceStatus;
use crate::rules::VatBreakdown;

/// The settlement fields of one invoice after a ledger transition.
///
/// Computed as a single unit so that a replacement (edit) of an allocation
/// is one transition, never a remove followed by a re-add with a transient
/// zero state in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerTotals {
    /// Sum of active payment allocations.
    pub amount_paid: Decimal,
    /// Sum of net amounts of active credit notes.
    pub credited_subtotal: Decimal,
    /// Sum of gross amounts of active credit notes.
    pub credited_total: Decimal,
    /// Outstanding balance after payments and credits.
    pub balance_due: Decimal,
    /// Status implied by the new balance.
    pub status: InvoiceStatus,
}

impl LedgerTotals {
    /// The cache patch applying this transition to the invoice row.
    #[must_use]
    pub fn into_patch(self) -> InvoicePatch {
        InvoicePatch {
            amount_paid: Some(self.amount_paid),
            credited_subtotal_amount: Some(self.credited_subtotal),
            credited_total_amount: Some(self.credited_total),
            balance_due: Some(self.balance_due),
            status: Some(self.status),
            ..InvoicePatch::default()
        }
    }
}

/// Row to persist when applying part of a payment to an invoice.
#[derive(Debug, Clone)]
pub struct PaymentAllocationInput {
    /// Source payment.
    pub payment_id: PaymentId,
    /// Target invoice.
    pub invoice_id: InvoiceId,
    /// Amount applied.
    pub amount_applied: Decimal,
    /// Whether this application pushes the invoice past its gross total.
    pub is_overallocated: bool,
}

/// Row to persist when issuing a credit note.
#[derive(Debug, Clone)]
pub struct CreditNoteInput {
    /// Invoice being corrected.
    pub invoice_id: InvoiceId,
    /// Human-facing note number.
    pub note_number: String,
    /// Credited net/vat/gross amounts.
    pub amounts: VatBreakdown,
    /// Date of issue.
    pub issued_on: NaiveDate,
}
