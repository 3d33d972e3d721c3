//! View projections and patch types for the billing entities.
//!
//! Each cached entity implements [`Projected`] so the view layer can keep
//! its list stores sorted without knowing the concrete type. Patches are
//! shallow: a `Some` field overwrites, a `None` field is left untouched.

use chrono::NaiveDate;
use faktura_views::sort::SortKey;
use faktura_views::store::Projected;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{CreditNote, CreditNoteStatus, Invoice, InvoiceStatus, Order, OrderStatus};
use crate::rules::VatBreakdown;

/// Shallow patch for a cached invoice.
#[derive(Debug, Clone, Default)]
pub struct InvoicePatch {
    /// New lifecycle status.
    pub status: Option<InvoiceStatus>,
    /// New invoice number.
    pub invoice_number: Option<String>,
    /// New issue date.
    pub invoice_date: Option<NaiveDate>,
    /// New net header amount.
    pub subtotal_amount: Option<Decimal>,
    /// New tax header amount.
    pub vat_amount: Option<Decimal>,
    /// New gross header amount.
    pub total_amount: Option<Decimal>,
    /// New paid total.
    pub amount_paid: Option<Decimal>,
    /// New credited net total.
    pub credited_subtotal_amount: Option<Decimal>,
    /// New credited gross total.
    pub credited_total_amount: Option<Decimal>,
    /// New outstanding balance.
    pub balance_due: Option<Decimal>,
}

impl InvoicePatch {
    /// Patch that replaces the three header amounts from one breakdown.
    #[must_use]
    pub fn header(breakdown: VatBreakdown) -> Self {
        Self {
            subtotal_amount: Some(breakdown.subtotal),
            vat_amount: Some(breakdown.vat),
            total_amount: Some(breakdown.total),
            ..Self::default()
        }
    }
}

impl Projected for Invoice {
    type Patch = InvoicePatch;

    fn id(&self) -> Uuid {
        self.id.into_inner()
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "invoice_date" => SortKey::date(self.invoice_date),
            "due_date" => SortKey::date(self.due_date),
            "invoice_number" => SortKey::text(&self.invoice_number),
            "subtotal_amount" => SortKey::Number(self.subtotal_amount),
            "total_amount" => SortKey::Number(self.total_amount),
            "amount_paid" => SortKey::Number(self.amount_paid),
            "balance_due" => SortKey::Number(self.balance_due),
            "status" => SortKey::text(self.status),
            _ => SortKey::Null,
        }
    }

    fn apply_patch(&mut self, patch: &Self::Patch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(number) = &patch.invoice_number {
            self.invoice_number.clone_from(number);
        }
        if let Some(date) = patch.invoice_date {
            self.invoice_date = Some(date);
        }
        if let Some(subtotal) = patch.subtotal_amount {
            self.subtotal_amount = subtotal;
        }
        if let Some(vat) = patch.vat_amount {
            self.vat_amount = vat;
        }
        if let Some(total) = patch.total_amount {
            self.total_amount = total;
        }
        if let Some(paid) = patch.amount_paid {
            self.amount_paid = paid;
        }
        if let Some(credited) = patch.credited_subtotal_amount {
            self.credited_subtotal_amount = credited;
        }
        if let Some(credited_total) = patch.credited_total_amount {
            self.credited_total_amount = credited_total;
        }
        if let Some(balance) = patch.balance_due {
            self.balance_due = balance;
        }
    }
}

/// Shallow patch for a cached order.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    /// New allocated subtotal.
    pub issued_subtotal: Option<Decimal>,
    /// New issuance status.
    pub status: Option<OrderStatus>,
}

impl OrderPatch {
    /// Patch recording a change in how much of the order is allocated.
    #[must_use]
    pub fn issuance(issued_subtotal: Decimal, status: OrderStatus) -> Self {
        Self {
            issued_subtotal: Some(issued_subtotal),
            status: Some(status),
        }
    }
}

impl Projected for Order {
    type Patch = OrderPatch;

    fn id(&self) -> Uuid {
        self.id.into_inner()
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "ordered_on" => SortKey::Date(self.ordered_on),
            "order_number" => SortKey::text(&self.order_number),
            "subtotal_amount" => SortKey::Number(self.subtotal_amount),
            "total_amount" => SortKey::Number(self.total_amount),
            "issued_subtotal" => SortKey::Number(self.issued_subtotal),
            "status" => SortKey::text(self.status),
            _ => SortKey::Null,
        }
    }

    fn apply_patch(&mut self, patch: &Self::Patch) {
        if let Some(issued) = patch.issued_subtotal {
            self.issued_subtotal = issued;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Shallow patch for a cached credit note. Only the status ever changes
/// after issuance.
#[derive(Debug, Clone, Default)]
pub struct CreditNotePatch {
    /// New lifecycle status.
    pub status: Option<CreditNoteStatus>,
}

impl CreditNotePatch {
    /// Patch that voids the note.
    #[must_use]
    pub fn voided() -> Self {
        Self {
            status: Some(CreditNoteStatus::Void),
        }
    }
}

impl Projected for CreditNote {
    type Patch = CreditNotePatch;

    fn id(&self) -> Uuid {
        self.id.into_inner()
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "issued_on" => SortKey::Date(self.issued_on),
            "note_number" => SortKey::text(&self.note_number),
            "subtotal_amount" => SortKey::Number(self.subtotal_amount),
            "total_amount" => SortKey::Number(self.total_amount),
            _ => SortKey::Null,
        }
    }

    fn apply_patch(&mut self, patch: &Self::Patch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use faktura_shared::types::id::InvoiceId;
    use faktura_shared::types::money::Currency;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::billing::types::InvoiceDirection;

    fn invoice() -> Invoice {
        Invoice {
            id: InvoiceId::new(),
            direction: InvoiceDirection::Receivable,
            status: InvoiceStatus::Issued,
            currency: Currency::Pln,
            invoice_number: "FV/2026/08/0001".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2026, 8, 15),
            due_date: NaiveDate::from_ymd_opt(2026, 9, 14),
            subtotal_amount: dec!(1000.00),
            vat_amount: dec!(230.00),
            total_amount: dec!(1230.00),
            amount_paid: dec!(0.00),
            credited_subtotal_amount: dec!(0.00),
            credited_total_amount: dec!(0.00),
            balance_due: dec!(1230.00),
        }
    }

    #[test]
    fn patch_overwrites_only_present_fields() {
        let mut inv = invoice();
        let patch = InvoicePatch {
            amount_paid: Some(dec!(1230.00)),
            balance_due: Some(dec!(0.00)),
            status: Some(InvoiceStatus::Paid),
            ..InvoicePatch::default()
        };
        inv.apply_patch(&patch);

        assert_eq!(inv.amount_paid, dec!(1230.00));
        assert_eq!(inv.balance_due, dec!(0.00));
        assert_eq!(inv.status, InvoiceStatus::Paid);
        // Untouched fields survive.
        assert_eq!(inv.total_amount, dec!(1230.00));
        assert_eq!(inv.invoice_number, "FV/2026/08/0001");
    }

    #[test]
    fn header_patch_replaces_all_three_amounts() {
        let mut inv = invoice();
        inv.apply_patch(&InvoicePatch::header(VatBreakdown {
            subtotal: dec!(500.00),
            vat: dec!(115.00),
            total: dec!(615.00),
        }));

        assert_eq!(inv.subtotal_amount, dec!(500.00));
        assert_eq!(inv.vat_amount, dec!(115.00));
        assert_eq!(inv.total_amount, dec!(615.00));
    }

    #[test]
    fn invoice_sort_keys_cover_view_fields() {
        let inv = invoice();
        assert_eq!(
            inv.sort_key("invoice_date"),
            SortKey::date(NaiveDate::from_ymd_opt(2026, 8, 15))
        );
        assert_eq!(inv.sort_key("balance_due"), SortKey::Number(dec!(1230.00)));
        assert_eq!(inv.sort_key("nonexistent"), SortKey::Null);
    }
}
