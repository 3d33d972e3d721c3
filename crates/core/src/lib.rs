//! Core billing logic for Faktura.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. Persistence and notifications are consumed through ports.
//!
//! # Modules
//!
//! - `rules` - Money/allocation rules: VAT, override reconciliation, balance
//! - `billing` - Domain types: orders, invoices, links, payments, credit notes
//! - `allocation` - Order-to-invoice allocation engine
//! - `ledger` - Payment/credit ledger and invoice status derivation
//! - `ports` - Persistence and notification interfaces
//! - `sync` - Post-write cache application across all open views

pub mod allocation;
pub mod billing;
pub mod ledger;
pub mod ports;
pub mod rules;
pub mod sync;
