//! Allocation service: plan, commit, then apply to caches.

use std::sync::Arc;

use super::engine::AllocationEngine;
use super::error::AllocationError;
use super::types::{AllocationRequest, CommittedAllocation, LinkAmendment, LinkRemoval};
use crate::billing::rows::OrderPatch;
use crate::ports::{BillingRepository, EntityAction, EntityEvent, EntityKind, Notifier};
use crate::sync::CacheLayer;

/// Orchestrates order-to-invoice allocation.
///
/// Cache application happens strictly after the repository confirms the
/// write, so a failed commit never leaves phantom rows in any open view.
pub struct AllocationService<R: BillingRepository, N: Notifier> {
    repo: Arc<R>,
    notifier: Arc<N>,
    cache: CacheLayer,
}

impl<R: BillingRepository, N: Notifier> AllocationService<R, N> {
    /// Creates an allocation service.
    #[must_use]
    pub fn new(repo: Arc<R>, notifier: Arc<N>, cache: CacheLayer) -> Self {
        Self {
            repo,
            notifier,
            cache,
        }
    }

    /// Bill the selected orders onto an invoice.
    ///
    /// # Errors
    ///
    /// Returns planning errors from [`AllocationEngine::plan`] or a
    /// [`AllocationError::Repository`] failure, in which case no cache was
    /// touched.
    pub async fn commit(
        &self,
        request: AllocationRequest,
    ) -> Result<CommittedAllocation, AllocationError> {
        let plan = AllocationEngine::plan(&request)?;
        tracing::info!(
            invoice_id = %plan.invoice_id,
            links = plan.links.len(),
            header_total = %plan.header.total,
            header_overridden = plan.header_overridden,
            "committing allocation"
        );

        let committed = self
            .repo
            .commit_allocation(&plan)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "allocation commit failed"))?;
        self.apply(&committed).await;
        Ok(committed)
    }

    /// Change the billed amount of one existing link.
    ///
    /// # Errors
    ///
    /// Returns planning errors from [`AllocationEngine::plan_amendment`] or
    /// a repository failure.
    pub async fn amend_link(
        &self,
        amendment: LinkAmendment,
    ) -> Result<CommittedAllocation, AllocationError> {
        let plan = AllocationEngine::plan_amendment(&amendment)?;
        let committed = self
            .repo
            .apply_link_change(&plan)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "link amendment failed"))?;
        self.apply(&committed).await;
        Ok(committed)
    }

    /// Remove one existing link, returning its amount to the order.
    ///
    /// # Errors
    ///
    /// Returns planning errors from [`AllocationEngine::plan_removal`] or a
    /// repository failure.
    pub async fn remove_link(
        &self,
        removal: LinkRemoval,
    ) -> Result<CommittedAllocation, AllocationError> {
        let plan = AllocationEngine::plan_removal(&removal)?;
        let committed = self
            .repo
            .apply_link_change(&plan)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "link removal failed"))?;
        self.apply(&committed).await;
        Ok(committed)
    }

    /// Applies committed rows to the caches, then notifies.
    async fn apply(&self, committed: &CommittedAllocation) {
        // The header may have moved the invoice's sorted position, so the
        // row is replaced rather than patched.
        self.cache.invoices.apply_replace(&committed.invoice);
        for order in &committed.orders {
            self.cache.orders.apply_patch(
                order.id.into_inner(),
                &OrderPatch::issuance(order.issued_subtotal, order.status),
            );
        }

        self.notifier
            .publish(EntityEvent::new(
                EntityKind::Invoice,
                committed.invoice.id.into_inner(),
                EntityAction::Updated,
            ))
            .await;
        for order in &committed.orders {
            self.notifier
                .publish(EntityEvent::new(
                    EntityKind::Order,
                    order.id.into_inner(),
                    EntityAction::Updated,
                ))
                .await;
        }
    }
}
