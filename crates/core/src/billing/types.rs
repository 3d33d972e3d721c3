//! Billing entities.

use chrono::NaiveDate;
use faktura_shared::types::id::{
    AllocationId, CreditNoteId, InvoiceId, LinkId, OrderId, PaymentId, TeamId,
};
use faktura_shared::types::money::{Currency, is_effectively_zero, round2};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Issuance status of an order, derived from how much of its subtotal has
/// been allocated to invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Nothing allocated yet.
    Draft,
    /// Some but not all of the subtotal is allocated.
    PartiallyIssued,
    /// The full subtotal is allocated.
    Issued,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::PartiallyIssued => "partially_issued",
            Self::Issued => "issued",
        };
        write!(f, "{s}")
    }
}

/// A sales or purchase order that invoices draw down from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Primary key.
    pub id: OrderId,
    /// Human-facing order number, e.g. `ZAM/2026/0042`.
    pub order_number: String,
    /// Currency of all monetary fields on this order.
    pub currency: Currency,
    /// Net order value.
    pub subtotal_amount: Decimal,
    /// Tax on the net value.
    pub vat_amount: Decimal,
    /// Gross order value.
    pub total_amount: Decimal,
    /// Sum of net amounts already allocated to invoices.
    pub issued_subtotal: Decimal,
    /// Derived issuance status.
    pub status: OrderStatus,
    /// Date the order was placed.
    pub ordered_on: NaiveDate,
}

impl Order {
    /// The unallocated portion of the order's subtotal. Clamped at zero so
    /// historical over-issuance never produces a negative remaining.
    pub fn remaining_subtotal(&self) -> Decimal {
        round2(self.subtotal_amount - self.issued_subtotal).max(Decimal::ZERO)
    }

    /// Status implied by the current `issued_subtotal`.
    pub fn derived_status(&self) -> OrderStatus {
        if is_effectively_zero(self.issued_subtotal) {
            OrderStatus::Draft
        } else if self.remaining_subtotal() > Decimal::ZERO {
            OrderStatus::PartiallyIssued
        } else {
            OrderStatus::Issued
        }
    }
}

/// Whether an invoice is money owed to us or by us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceDirection {
    /// Accounts receivable - we issued the invoice.
    #[serde(rename = "ar")]
    Receivable,
    /// Accounts payable - we received the invoice.
    #[serde(rename = "ap")]
    Payable,
}

/// Lifecycle status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Editable, not yet issued.
    Draft,
    /// Finalized with a number and date.
    Issued,
    /// Delivered to the counterparty.
    Sent,
    /// Some payment applied, balance still open.
    PartiallyPaid,
    /// Balance settled within the epsilon.
    Paid,
    /// Withdrawn before issuance took effect.
    Cancelled,
    /// Annulled after issuance.
    Void,
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Issued => "issued",
            Self::Sent => "sent",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
            Self::Void => "void",
        };
        write!(f, "{s}")
    }
}

impl InvoiceStatus {
    /// Terminal or pre-issuance statuses that payment activity never moves.
    pub fn is_settlement_frozen(&self) -> bool {
        matches!(self, Self::Draft | Self::Cancelled | Self::Void)
    }
}

/// An invoice. Header amounts are either derived from allocated orders or
/// explicitly overridden; `amount_paid`, the credited fields, and
/// `balance_due` are maintained by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Primary key.
    pub id: InvoiceId,
    /// Receivable or payable.
    pub direction: InvoiceDirection,
    /// Lifecycle status.
    pub status: InvoiceStatus,
    /// Currency of all monetary fields on this invoice.
    pub currency: Currency,
    /// Human-facing number, e.g. `FV/2026/08/0017`. Empty until issued.
    pub invoice_number: String,
    /// Issue date. `None` while draft.
    pub invoice_date: Option<NaiveDate>,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
    /// Net header amount.
    pub subtotal_amount: Decimal,
    /// Tax header amount.
    pub vat_amount: Decimal,
    /// Gross header amount.
    pub total_amount: Decimal,
    /// Sum of active payment allocations.
    pub amount_paid: Decimal,
    /// Sum of net amounts of active credit notes.
    pub credited_subtotal_amount: Decimal,
    /// Sum of gross amounts of active credit notes.
    pub credited_total_amount: Decimal,
    /// `total_amount - amount_paid - credited_total_amount`, epsilon-snapped.
    pub balance_due: Decimal,
}

/// Join row recording how much of an order one invoice bills.
///
/// When all three override fields are `None`, the link bills the order's own
/// header amounts in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInvoiceLink {
    /// Primary key.
    pub id: LinkId,
    /// Order this link draws from.
    pub order_id: OrderId,
    /// Invoice this link bills to.
    pub invoice_id: InvoiceId,
    /// Net amount billed by this link, when partial.
    pub override_subtotal: Option<Decimal>,
    /// Tax on the billed net, when partial.
    pub override_vat: Option<Decimal>,
    /// Gross billed, when partial.
    pub override_total: Option<Decimal>,
}

impl OrderInvoiceLink {
    /// The net amount this link bills against the given order.
    pub fn billed_subtotal(&self, order: &Order) -> Decimal {
        self.override_subtotal.unwrap_or(order.subtotal_amount)
    }
}

/// Direction of money movement for a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentDirection {
    /// Money received.
    Inbound,
    /// Money sent.
    Outbound,
}

/// A recorded money movement, allocatable to one or more invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Primary key.
    pub id: PaymentId,
    /// Full payment amount.
    pub amount: Decimal,
    /// Currency of the payment.
    pub currency: Currency,
    /// Inbound or outbound.
    pub direction: PaymentDirection,
    /// Team that paid.
    pub payer_team: TeamId,
    /// Team that was paid.
    pub payee_team: TeamId,
    /// Value date of the transfer.
    pub paid_on: NaiveDate,
}

/// Join row applying part of a payment to one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentAllocation {
    /// Primary key.
    pub id: AllocationId,
    /// Source payment.
    pub payment_id: PaymentId,
    /// Target invoice.
    pub invoice_id: InvoiceId,
    /// Portion of the payment applied to the invoice.
    pub amount_applied: Decimal,
    /// Set when this allocation pushed the invoice's paid total past its
    /// gross amount. Allowed, but surfaced.
    pub is_overallocated: bool,
}

/// Lifecycle status of a credit note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditNoteStatus {
    /// Active, reduces the invoice balance.
    Issued,
    /// Annulled, contributes nothing but stays queryable.
    Void,
}

/// A correction document reducing an invoice's effective amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditNote {
    /// Primary key.
    pub id: CreditNoteId,
    /// Invoice being corrected.
    pub invoice_id: InvoiceId,
    /// Human-facing number, e.g. `KOR/2026/08/0003`.
    pub note_number: String,
    /// Net credited amount.
    pub subtotal_amount: Decimal,
    /// Tax on the credited net.
    pub vat_amount: Decimal,
    /// Gross credited amount.
    pub total_amount: Decimal,
    /// Issued or void.
    pub status: CreditNoteStatus,
    /// Date of issue.
    pub issued_on: NaiveDate,
}

impl CreditNote {
    /// Whether this note currently counts toward the invoice's credited
    /// totals.
    pub fn is_active(&self) -> bool {
        self.status == CreditNoteStatus::Issued
    }
}
