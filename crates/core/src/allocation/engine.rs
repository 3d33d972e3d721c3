//! Pure allocation planner.

use faktura_shared::types::money::round2;
use rust_decimal::Decimal;

use super::error::AllocationError;
use super::types::{
    AllocationPlan, AllocationRequest, LinkAmendment, LinkChangePlan, LinkRemoval,
    OrderIssueUpdate, PlannedLink,
};
use crate::billing::types::Order;
use crate::rules::BillingRules;

/// Stateless allocation planner.
///
/// All methods are pure: they read the order snapshots carried in the
/// request and produce a plan, leaving persistence and cache application to
/// [`super::service::AllocationService`].
pub struct AllocationEngine;

impl AllocationEngine {
    /// Plan billing the selected orders onto one invoice.
    ///
    /// Per selection, the requested net amount (defaulting to the order's
    /// full remaining subtotal) is clamped to what the order has left. An
    /// order repeated across selections bills against what earlier
    /// selections in the same plan already took, and yields one combined
    /// issuance update. Selections that clamp to zero produce no link. The
    /// invoice header is the VAT breakdown of the link sum, unless an
    /// explicit override decouples it.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::CurrencyMismatch`] if any order is in a
    ///   different currency than the invoice
    /// - [`AllocationError::NoAllocationSelected`] if no link bills a
    ///   positive amount and no positive header override is present
    /// - [`AllocationError::Rules`] for negative requests or bad VAT rates
    pub fn plan(request: &AllocationRequest) -> Result<AllocationPlan, AllocationError> {
        let mut links = Vec::with_capacity(request.selections.len());
        let mut billed_sum = Decimal::ZERO;
        // Cumulative billed per order within this plan, in first-seen order.
        // A duplicated order must not bill its snapshot remaining twice.
        let mut touched: Vec<(&Order, Decimal)> = Vec::new();

        for selection in &request.selections {
            let order = &selection.order;
            if order.currency != request.currency {
                return Err(AllocationError::CurrencyMismatch {
                    expected: request.currency,
                    got: order.currency,
                });
            }

            let already_billed = touched
                .iter()
                .find(|(seen, _)| seen.id == order.id)
                .map_or(Decimal::ZERO, |(_, billed)| *billed);
            let remaining = order.remaining_subtotal() - already_billed;
            let requested = selection.requested_subtotal.unwrap_or(remaining);
            let reconciled = BillingRules::reconcile_override(remaining, requested)?;

            if reconciled.billed.is_zero() {
                continue;
            }
            // Clamping guarantees this, but a broken remaining computation
            // must never reach the repository.
            if reconciled.billed > remaining {
                return Err(AllocationError::InsufficientRemaining {
                    order_id: order.id,
                    requested: reconciled.billed,
                    remaining,
                });
            }

            links.push(PlannedLink {
                order_id: order.id,
                billed: BillingRules::compute_vat(reconciled.billed, request.vat_rate)?,
                is_partial: reconciled.is_partial,
            });
            match touched.iter().position(|(seen, _)| seen.id == order.id) {
                Some(idx) => touched[idx].1 += reconciled.billed,
                None => touched.push((order, reconciled.billed)),
            }
            billed_sum += reconciled.billed;
        }
        let order_updates = touched
            .into_iter()
            .map(|(order, billed)| issue_update(order, billed))
            .collect();

        let (header_subtotal, header_overridden) = match request.header_override {
            Some(header) => (header.subtotal, true),
            None => (billed_sum, false),
        };
        if links.is_empty() && header_subtotal <= Decimal::ZERO {
            return Err(AllocationError::NoAllocationSelected);
        }

        Ok(AllocationPlan {
            invoice_id: request.invoice_id,
            currency: request.currency,
            links,
            header: BillingRules::compute_vat(header_subtotal, request.vat_rate)?,
            header_overridden,
            order_updates,
        })
    }

    /// Plan changing the billed amount of an existing link.
    ///
    /// The amount the link already bills is handed back to the order before
    /// clamping, so amending a link downward always succeeds and amending
    /// upward can use the freed room plus whatever else remains.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::NoAllocationSelected`] if the new amount clamps
    ///   to zero (remove the link instead)
    /// - [`AllocationError::Rules`] for negative requests or bad VAT rates
    pub fn plan_amendment(amendment: &LinkAmendment) -> Result<LinkChangePlan, AllocationError> {
        let order = &amendment.order;
        let available = round2(order.remaining_subtotal() + amendment.old_billed_subtotal);
        let reconciled =
            BillingRules::reconcile_override(available, amendment.requested_subtotal)?;
        if reconciled.billed.is_zero() {
            return Err(AllocationError::NoAllocationSelected);
        }

        let delta = reconciled.billed - amendment.old_billed_subtotal;
        let new_header = if amendment.header_overridden {
            None
        } else {
            Some(BillingRules::compute_vat(
                round2(amendment.other_links_subtotal + reconciled.billed),
                amendment.vat_rate,
            )?)
        };

        Ok(LinkChangePlan {
            link_id: amendment.link_id,
            invoice_id: amendment.invoice_id,
            new_billed: Some(BillingRules::compute_vat(
                reconciled.billed,
                amendment.vat_rate,
            )?),
            is_partial: reconciled.is_partial,
            order_update: issue_update(order, delta),
            new_header,
        })
    }

    /// Plan removing an existing link, returning its billed amount to the
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::Rules`] if the VAT rate is out of range.
    pub fn plan_removal(removal: &LinkRemoval) -> Result<LinkChangePlan, AllocationError> {
        let new_header = if removal.header_overridden {
            None
        } else {
            Some(BillingRules::compute_vat(
                round2(removal.other_links_subtotal),
                removal.vat_rate,
            )?)
        };

        Ok(LinkChangePlan {
            link_id: removal.link_id,
            invoice_id: removal.invoice_id,
            new_billed: None,
            is_partial: false,
            order_update: issue_update(&removal.order, -removal.old_billed_subtotal),
            new_header,
        })
    }
}

/// Builds the order issuance update for a billed-amount delta.
fn issue_update(order: &Order, delta: Decimal) -> OrderIssueUpdate {
    let issued = round2(order.issued_subtotal + delta).max(Decimal::ZERO);
    let remaining = round2(order.subtotal_amount - issued).max(Decimal::ZERO);
    let shadow = Order {
        issued_subtotal: issued,
        ..order.clone()
    };
    OrderIssueUpdate {
        order_id: order.id,
        issued_subtotal: issued,
        remaining_subtotal: remaining,
        status: shadow.derived_status(),
    }
}
