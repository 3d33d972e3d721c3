//! Persistence and notification ports.
//!
//! The core services never talk to a backend directly. Writes go through
//! [`BillingRepository`] and committed changes are announced through
//! [`Notifier`]. Both are implemented by the hosting application.

use faktura_shared::types::id::{AllocationId, CreditNoteId, InvoiceId, OrderId, PaymentId};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::allocation::types::{AllocationPlan, CommittedAllocation, LinkChangePlan};
use crate::billing::types::{CreditNote, Invoice, Order, PaymentAllocation};
use crate::ledger::types::{CreditNoteInput, PaymentAllocationInput};

/// Errors surfaced by a repository implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The backend rejected or failed the operation.
    #[error("Repository operation failed: {0}")]
    Remote(String),

    /// The commit raced another writer and was not applied.
    #[error("Write conflict: {0}")]
    Conflict(String),
}

/// Kind of entity an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// An invoice row.
    Invoice,
    /// An order row.
    Order,
    /// A credit note row.
    CreditNote,
    /// A payment allocation row.
    PaymentAllocation,
}

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityAction {
    /// The entity was created.
    Created,
    /// The entity was updated.
    Updated,
    /// The entity was removed.
    Removed,
}

/// A committed change, published after the caches have been updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityEvent {
    /// Entity kind.
    pub entity: EntityKind,
    /// Entity primary key.
    pub id: Uuid,
    /// What happened.
    pub action: EntityAction,
}

impl EntityEvent {
    /// Creates an event.
    #[must_use]
    pub fn new(entity: EntityKind, id: Uuid, action: EntityAction) -> Self {
        Self { entity, id, action }
    }
}

/// Repository trait for billing persistence.
///
/// This trait is implemented by the hosting application against its remote
/// backend. Every mutation is transactional: either all rows of the call
/// are persisted or none are.
pub trait BillingRepository: Send + Sync {
    /// Commit an allocation plan: create links, update the invoice header,
    /// and update order issuance in one transaction.
    fn commit_allocation(
        &self,
        plan: &AllocationPlan,
    ) -> impl std::future::Future<Output = Result<CommittedAllocation, RepositoryError>> + Send;

    /// Apply a link amendment or removal in one transaction.
    fn apply_link_change(
        &self,
        plan: &LinkChangePlan,
    ) -> impl std::future::Future<Output = Result<CommittedAllocation, RepositoryError>> + Send;

    /// Create a payment allocation row.
    fn insert_payment_allocation(
        &self,
        input: &PaymentAllocationInput,
    ) -> impl std::future::Future<Output = Result<PaymentAllocation, RepositoryError>> + Send;

    /// Replace the applied amount of an existing payment allocation.
    fn replace_payment_allocation(
        &self,
        id: AllocationId,
        amount_applied: Decimal,
        is_overallocated: bool,
    ) -> impl std::future::Future<Output = Result<PaymentAllocation, RepositoryError>> + Send;

    /// Delete a payment allocation row.
    fn delete_payment_allocation(
        &self,
        id: AllocationId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Create a credit note against an invoice.
    fn insert_credit_note(
        &self,
        input: &CreditNoteInput,
    ) -> impl std::future::Future<Output = Result<CreditNote, RepositoryError>> + Send;

    /// Void a credit note, keeping it queryable.
    fn void_credit_note(
        &self,
        id: CreditNoteId,
    ) -> impl std::future::Future<Output = Result<CreditNote, RepositoryError>> + Send;

    /// Fetch an invoice by ID.
    fn fetch_invoice(
        &self,
        id: InvoiceId,
    ) -> impl std::future::Future<Output = Result<Option<Invoice>, RepositoryError>> + Send;

    /// Fetch an order by ID.
    fn fetch_order(
        &self,
        id: OrderId,
    ) -> impl std::future::Future<Output = Result<Option<Order>, RepositoryError>> + Send;

    /// List the allocations of one payment.
    fn fetch_payment_allocations(
        &self,
        payment_id: PaymentId,
    ) -> impl std::future::Future<Output = Result<Vec<PaymentAllocation>, RepositoryError>> + Send;
}

/// Outbound notification port for committed changes.
///
/// Published strictly after the repository write and the cache application,
/// so subscribers always observe caches at least as fresh as the event.
pub trait Notifier: Send + Sync {
    /// Publish one entity event.
    fn publish(&self, event: EntityEvent) -> impl std::future::Future<Output = ()> + Send;
}
