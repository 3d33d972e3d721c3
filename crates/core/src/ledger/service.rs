//! Ledger service: settlement writes and cache application.

use std::sync::Arc;

use faktura_shared::types::id::InvoiceId;
use faktura_shared::types::money::round2;
use rust_decimal::Decimal;

use super::compute;
use super::error::LedgerError;
use super::types::{CreditNoteInput, PaymentAllocationInput};
use crate::billing::rows::CreditNotePatch;
use crate::billing::types::{CreditNote, Invoice, Payment, PaymentAllocation};
use crate::ports::{BillingRepository, EntityAction, EntityEvent, EntityKind, Notifier};
use crate::rules::VatBreakdown;
use crate::sync::CacheLayer;

/// Orchestrates payment allocations and credit notes against invoices.
///
/// Same ordering discipline as allocation: repository first, caches second,
/// notifications last.
pub struct LedgerService<R: BillingRepository, N: Notifier> {
    repo: Arc<R>,
    notifier: Arc<N>,
    cache: CacheLayer,
}

impl<R: BillingRepository, N: Notifier> LedgerService<R, N> {
    /// Creates a ledger service.
    #[must_use]
    pub fn new(repo: Arc<R>, notifier: Arc<N>, cache: CacheLayer) -> Self {
        Self {
            repo,
            notifier,
            cache,
        }
    }

    /// Apply part of a payment to an invoice.
    ///
    /// The payment-side cap is a hard invariant; the invoice side allows
    /// overpayment but flags it on the allocation row and logs a warning.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NonPositiveAmount`] for zero or negative amounts
    /// - [`LedgerError::InvoiceNotFound`] if the invoice does not exist
    /// - [`LedgerError::CurrencyMismatch`] across payment and invoice
    /// - [`LedgerError::ExceedsPaymentAmount`] past the payment cap
    pub async fn apply_payment_allocation(
        &self,
        payment: &Payment,
        invoice_id: InvoiceId,
        amount: Decimal,
    ) -> Result<PaymentAllocation, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(amount));
        }
        let invoice = self.fetch_invoice(invoice_id).await?;
        if payment.currency != invoice.currency {
            return Err(LedgerError::CurrencyMismatch {
                expected: invoice.currency,
                got: payment.currency,
            });
        }

        let siblings = self.repo.fetch_payment_allocations(payment.id).await?;
        compute::ensure_payment_capacity(payment, &siblings, amount, None)?;

        let new_paid = round2(invoice.amount_paid + amount);
        let is_overallocated = compute::is_overallocated(invoice.total_amount, new_paid);
        if is_overallocated {
            tracing::warn!(
                invoice_id = %invoice_id,
                total = %invoice.total_amount,
                paid = %new_paid,
                "allocation overpays the invoice"
            );
        }

        let allocation = self
            .repo
            .insert_payment_allocation(&PaymentAllocationInput {
                payment_id: payment.id,
                invoice_id,
                amount_applied: amount,
                is_overallocated,
            })
            .await
            .inspect_err(|e| tracing::error!(error = %e, "payment allocation failed"))?;

        let totals = compute::totals_with_payment(&invoice, amount);
        self.cache
            .invoices
            .apply_patch(invoice_id.into_inner(), &totals.into_patch());

        self.publish_allocation(&allocation, EntityAction::Created)
            .await;
        Ok(allocation)
    }

    /// Replace the applied amount of an existing allocation in one
    /// transition: observers never see the old amount removed before the
    /// new one lands.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::apply_payment_allocation`], with the
    /// replaced allocation excluded from the payment-cap check.
    pub async fn replace_payment_allocation(
        &self,
        payment: &Payment,
        allocation: &PaymentAllocation,
        new_amount: Decimal,
    ) -> Result<PaymentAllocation, LedgerError> {
        if new_amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(new_amount));
        }
        let invoice = self.fetch_invoice(allocation.invoice_id).await?;

        let siblings = self.repo.fetch_payment_allocations(payment.id).await?;
        compute::ensure_payment_capacity(payment, &siblings, new_amount, Some(allocation.id))?;

        let new_paid = round2(invoice.amount_paid - allocation.amount_applied + new_amount);
        let is_overallocated = compute::is_overallocated(invoice.total_amount, new_paid);
        if is_overallocated {
            tracing::warn!(
                invoice_id = %allocation.invoice_id,
                total = %invoice.total_amount,
                paid = %new_paid,
                "edited allocation overpays the invoice"
            );
        }

        let replaced = self
            .repo
            .replace_payment_allocation(allocation.id, new_amount, is_overallocated)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "allocation edit failed"))?;

        let totals =
            compute::totals_with_replacement(&invoice, allocation.amount_applied, new_amount);
        self.cache
            .invoices
            .apply_patch(allocation.invoice_id.into_inner(), &totals.into_patch());

        self.publish_allocation(&replaced, EntityAction::Updated)
            .await;
        Ok(replaced)
    }

    /// Remove an allocation, returning its amount to the payment.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvoiceNotFound`] or a repository failure.
    pub async fn remove_payment_allocation(
        &self,
        allocation: &PaymentAllocation,
    ) -> Result<(), LedgerError> {
        let invoice = self.fetch_invoice(allocation.invoice_id).await?;

        self.repo
            .delete_payment_allocation(allocation.id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "allocation removal failed"))?;

        let totals = compute::totals_with_payment(&invoice, -allocation.amount_applied);
        self.cache
            .invoices
            .apply_patch(allocation.invoice_id.into_inner(), &totals.into_patch());

        self.publish_allocation(allocation, EntityAction::Removed)
            .await;
        Ok(())
    }

    /// Issue a credit note against an invoice.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NonPositiveAmount`] for a non-positive credited net
    /// - [`LedgerError::InvoiceNotFound`] if the invoice does not exist
    pub async fn issue_credit_note(
        &self,
        input: CreditNoteInput,
    ) -> Result<CreditNote, LedgerError> {
        if input.amounts.subtotal <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(input.amounts.subtotal));
        }
        let invoice = self.fetch_invoice(input.invoice_id).await?;

        let note = self
            .repo
            .insert_credit_note(&input)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "credit note issue failed"))?;

        let totals = compute::totals_with_credit(&invoice, input.amounts, true);
        self.cache.credit_notes.apply_insert(&note);
        self.cache
            .invoices
            .apply_patch(input.invoice_id.into_inner(), &totals.into_patch());

        self.notifier
            .publish(EntityEvent::new(
                EntityKind::CreditNote,
                note.id.into_inner(),
                EntityAction::Created,
            ))
            .await;
        self.publish_invoice(input.invoice_id).await;
        Ok(note)
    }

    /// Void a credit note. The note stays queryable but stops contributing
    /// to the invoice's credited totals.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::CreditNoteAlreadyVoid`] if already void
    /// - [`LedgerError::InvoiceNotFound`] if the invoice does not exist
    pub async fn void_credit_note(&self, note: &CreditNote) -> Result<CreditNote, LedgerError> {
        if !note.is_active() {
            return Err(LedgerError::CreditNoteAlreadyVoid(note.id));
        }
        let invoice = self.fetch_invoice(note.invoice_id).await?;

        let voided = self
            .repo
            .void_credit_note(note.id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "credit note void failed"))?;

        let amounts = VatBreakdown {
            subtotal: note.subtotal_amount,
            vat: note.vat_amount,
            total: note.total_amount,
        };
        let totals = compute::totals_with_credit(&invoice, amounts, false);
        self.cache
            .credit_notes
            .apply_patch(note.id.into_inner(), &CreditNotePatch::voided());
        self.cache
            .invoices
            .apply_patch(note.invoice_id.into_inner(), &totals.into_patch());

        self.notifier
            .publish(EntityEvent::new(
                EntityKind::CreditNote,
                note.id.into_inner(),
                EntityAction::Updated,
            ))
            .await;
        self.publish_invoice(note.invoice_id).await;
        Ok(voided)
    }

    /// Re-fetch an invoice and replace the cached rows with network truth.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvoiceNotFound`] or a repository failure.
    pub async fn refresh_invoice(&self, invoice_id: InvoiceId) -> Result<Invoice, LedgerError> {
        let invoice = self.fetch_invoice(invoice_id).await?;
        self.cache.invoices.apply_replace(&invoice);
        Ok(invoice)
    }

    async fn fetch_invoice(&self, invoice_id: InvoiceId) -> Result<Invoice, LedgerError> {
        self.repo
            .fetch_invoice(invoice_id)
            .await?
            .ok_or(LedgerError::InvoiceNotFound(invoice_id))
    }

    async fn publish_allocation(&self, allocation: &PaymentAllocation, action: EntityAction) {
        self.notifier
            .publish(EntityEvent::new(
                EntityKind::PaymentAllocation,
                allocation.id.into_inner(),
                action,
            ))
            .await;
        self.publish_invoice(allocation.invoice_id).await;
    }

    async fn publish_invoice(&self, invoice_id: InvoiceId) {
        self.notifier
            .publish(EntityEvent::new(
                EntityKind::Invoice,
                invoice_id.into_inner(),
                EntityAction::Updated,
            ))
            .await;
    }
}
