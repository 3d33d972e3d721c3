//! Billing domain types.
//!
//! Orders, invoices, the links that tie them together, payments, payment
//! allocations, and credit notes. These are plain data carriers; the
//! derivation logic lives in `rules`, `allocation`, and `ledger`.

pub mod rows;
pub mod types;

pub use types::{
    CreditNote, CreditNoteStatus, Invoice, InvoiceDirection, InvoiceStatus, Order,
    OrderInvoiceLink, OrderStatus, Payment, PaymentAllocation, PaymentDirection,
};
