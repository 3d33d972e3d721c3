//! Pure ledger arithmetic.
//!
//! Free functions over invoice and allocation snapshots. Each `totals_*`
//! function produces the complete post-transition [`LedgerTotals`] in one
//! step.

use faktura_shared::types::id::AllocationId;
use faktura_shared::types::money::{BALANCE_EPSILON, round2};
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::LedgerTotals;
use crate::billing::types::{Invoice, InvoiceStatus, Payment, PaymentAllocation};
use crate::rules::{BillingRules, VatBreakdown};

/// Sum of applied amounts over the given allocations.
#[must_use]
pub fn allocated_total(allocations: &[PaymentAllocation]) -> Decimal {
    round2(allocations.iter().map(|a| a.amount_applied).sum())
}

/// How much of the payment is still unallocated.
#[must_use]
pub fn payment_remaining(payment: &Payment, allocations: &[PaymentAllocation]) -> Decimal {
    round2(payment.amount - allocated_total(allocations))
}

/// Checks that applying `new_amount` (optionally replacing one existing
/// allocation) keeps the payment's allocation sum within its amount.
///
/// # Errors
///
/// Returns [`LedgerError::ExceedsPaymentAmount`] when the sum would pass
/// the payment amount. No clamping here: the payment cap is a hard
/// invariant, unlike the invoice-side overpayment which is merely flagged.
pub fn ensure_payment_capacity(
    payment: &Payment,
    allocations: &[PaymentAllocation],
    new_amount: Decimal,
    replacing: Option<AllocationId>,
) -> Result<(), LedgerError> {
    let kept: Decimal = allocations
        .iter()
        .filter(|a| Some(a.id) != replacing)
        .map(|a| a.amount_applied)
        .sum();
    let attempted = round2(kept + new_amount);

    if attempted > payment.amount {
        return Err(LedgerError::ExceedsPaymentAmount {
            payment_amount: payment.amount,
            attempted,
        });
    }
    Ok(())
}

/// Whether a paid total passes the invoice's gross amount beyond the
/// settlement epsilon.
#[must_use]
pub fn is_overallocated(invoice_total: Decimal, new_paid: Decimal) -> bool {
    new_paid - invoice_total >= BALANCE_EPSILON
}

/// Status implied by the settlement state, given where the invoice is now.
///
/// Draft, cancelled, and void invoices are never advanced by payment
/// activity. A settled (or overpaid) balance with any money or credit
/// applied is `Paid`; a partial application is `PartiallyPaid`; removing
/// the last allocation regresses a paid invoice back to `Issued`.
#[must_use]
pub fn derive_status(
    prior: InvoiceStatus,
    total: Decimal,
    amount_paid: Decimal,
    credited_total: Decimal,
) -> InvoiceStatus {
    if prior.is_settlement_frozen() {
        return prior;
    }

    let balance = BillingRules::derive_balance_due(total, amount_paid, credited_total);
    let applied = amount_paid + credited_total;

    if balance <= Decimal::ZERO && applied > Decimal::ZERO {
        InvoiceStatus::Paid
    } else if applied > Decimal::ZERO {
        InvoiceStatus::PartiallyPaid
    } else if matches!(prior, InvoiceStatus::PartiallyPaid | InvoiceStatus::Paid) {
        InvoiceStatus::Issued
    } else {
        prior
    }
}

/// Totals after changing the invoice's paid amount by `delta` (positive for
/// a new allocation, negative for a removal).
#[must_use]
pub fn totals_with_payment(invoice: &Invoice, delta: Decimal) -> LedgerTotals {
    let amount_paid = round2(invoice.amount_paid + delta).max(Decimal::ZERO);
    build_totals(
        invoice,
        amount_paid,
        invoice.credited_subtotal_amount,
        invoice.credited_total_amount,
    )
}

/// Totals after replacing one allocation's amount in a single transition.
///
/// Equivalent to removing `old` and applying `new`, but computed as one
/// step so no observer ever sees the intermediate state.
#[must_use]
pub fn totals_with_replacement(invoice: &Invoice, old: Decimal, new: Decimal) -> LedgerTotals {
    totals_with_payment(invoice, new - old)
}

/// Totals after a credit note is issued (`apply = true`) or voided
/// (`apply = false`).
#[must_use]
pub fn totals_with_credit(invoice: &Invoice, note: VatBreakdown, apply: bool) -> LedgerTotals {
    let sign = if apply { Decimal::ONE } else { -Decimal::ONE };
    let credited_subtotal =
        round2(invoice.credited_subtotal_amount + sign * note.subtotal).max(Decimal::ZERO);
    let credited_total =
        round2(invoice.credited_total_amount + sign * note.total).max(Decimal::ZERO);
    build_totals(invoice, invoice.amount_paid, credited_subtotal, credited_total)
}

fn build_totals(
    invoice: &Invoice,
    amount_paid: Decimal,
    credited_subtotal: Decimal,
    credited_total: Decimal,
) -> LedgerTotals {
    let balance_due =
        BillingRules::derive_balance_due(invoice.total_amount, amount_paid, credited_total);
    LedgerTotals {
        amount_paid,
        credited_subtotal,
        credited_total,
        balance_due,
        status: derive_status(
            invoice.status,
            invoice.total_amount,
            amount_paid,
            credited_total,
        ),
    }
}
