//! Allocation inputs, plans, and commit results.

use faktura_shared::types::id::{InvoiceId, LinkId, OrderId};
use faktura_shared::types::money::Currency;
use rust_decimal::Decimal;

use crate::billing::types::{Invoice, Order, OrderInvoiceLink, OrderStatus};
use crate::rules::VatBreakdown;

/// One order the user picked for billing, with an optional partial amount.
///
/// A `None` request means "bill everything the order has left" (the
/// bill-all default).
#[derive(Debug, Clone)]
pub struct OrderSelection {
    /// The order as the client currently sees it.
    pub order: Order,
    /// Requested net amount, or `None` for the full remaining subtotal.
    pub requested_subtotal: Option<Decimal>,
}

/// Explicit invoice-header amount, decoupled from the per-order links.
#[derive(Debug, Clone, Copy)]
pub struct HeaderOverride {
    /// Net header amount the invoice should carry.
    pub subtotal: Decimal,
}

/// Everything the engine needs to plan one allocation.
#[derive(Debug, Clone)]
pub struct AllocationRequest {
    /// Invoice receiving the allocation.
    pub invoice_id: InvoiceId,
    /// Invoice currency. Every selected order must match.
    pub currency: Currency,
    /// VAT rate in percent applied to billed amounts.
    pub vat_rate: Decimal,
    /// Orders to draw from.
    pub selections: Vec<OrderSelection>,
    /// Optional header amount decoupled from the link sum.
    pub header_override: Option<HeaderOverride>,
}

/// One link the plan will create.
#[derive(Debug, Clone)]
pub struct PlannedLink {
    /// Order being billed.
    pub order_id: OrderId,
    /// Billed net/vat/gross for this link.
    pub billed: VatBreakdown,
    /// True when the order still has unbilled subtotal after this link.
    pub is_partial: bool,
}

/// The issuance change a plan makes to one order.
#[derive(Debug, Clone)]
pub struct OrderIssueUpdate {
    /// Order being updated.
    pub order_id: OrderId,
    /// New allocated subtotal after the plan.
    pub issued_subtotal: Decimal,
    /// New remaining subtotal after the plan.
    pub remaining_subtotal: Decimal,
    /// Status implied by the new issuance.
    pub status: OrderStatus,
}

/// A fully planned allocation, ready to commit in one transaction.
#[derive(Debug, Clone)]
pub struct AllocationPlan {
    /// Invoice receiving the links.
    pub invoice_id: InvoiceId,
    /// Currency everything is denominated in.
    pub currency: Currency,
    /// Links to create.
    pub links: Vec<PlannedLink>,
    /// Invoice header amounts after the allocation.
    pub header: VatBreakdown,
    /// Whether the header came from an explicit override rather than the
    /// link sum.
    pub header_overridden: bool,
    /// Order issuance updates to apply atomically with the links.
    pub order_updates: Vec<OrderIssueUpdate>,
}

/// A change to one existing link: a new billed amount, or removal.
#[derive(Debug, Clone)]
pub struct LinkChangePlan {
    /// Link being changed.
    pub link_id: LinkId,
    /// Invoice the link belongs to.
    pub invoice_id: InvoiceId,
    /// New billed amounts, or `None` when the link is removed.
    pub new_billed: Option<VatBreakdown>,
    /// True when the amendment leaves part of the order's available room
    /// unbilled.
    pub is_partial: bool,
    /// Issuance update for the affected order.
    pub order_update: OrderIssueUpdate,
    /// Recomputed invoice header, or `None` when the header is overridden
    /// and therefore untouched by link changes.
    pub new_header: Option<VatBreakdown>,
}

/// Inputs for amending the billed amount of an existing link.
#[derive(Debug, Clone)]
pub struct LinkAmendment {
    /// Link being amended.
    pub link_id: LinkId,
    /// Invoice the link belongs to.
    pub invoice_id: InvoiceId,
    /// Current state of the linked order.
    pub order: Order,
    /// Net amount the link bills today.
    pub old_billed_subtotal: Decimal,
    /// Net amount the user now wants the link to bill.
    pub requested_subtotal: Decimal,
    /// VAT rate in percent.
    pub vat_rate: Decimal,
    /// Sum of billed net amounts over the invoice's other links.
    pub other_links_subtotal: Decimal,
    /// Whether the invoice header is explicitly overridden.
    pub header_overridden: bool,
}

/// Inputs for removing an existing link.
#[derive(Debug, Clone)]
pub struct LinkRemoval {
    /// Link being removed.
    pub link_id: LinkId,
    /// Invoice the link belongs to.
    pub invoice_id: InvoiceId,
    /// Current state of the linked order.
    pub order: Order,
    /// Net amount the link bills today.
    pub old_billed_subtotal: Decimal,
    /// VAT rate in percent.
    pub vat_rate: Decimal,
    /// Sum of billed net amounts over the invoice's other links.
    pub other_links_subtotal: Decimal,
    /// Whether the invoice header is explicitly overridden.
    pub header_overridden: bool,
}

/// What the repository returns after committing a plan: the rows as
/// persisted, which the services then feed to the caches verbatim.
#[derive(Debug, Clone)]
pub struct CommittedAllocation {
    /// Invoice after the commit.
    pub invoice: Invoice,
    /// Links of the invoice after the commit.
    pub links: Vec<OrderInvoiceLink>,
    /// Orders whose issuance changed.
    pub orders: Vec<Order>,
}
