//! Property-based tests for the ledger arithmetic.

use chrono::NaiveDate;
use faktura_shared::types::id::InvoiceId;
use faktura_shared::types::money::Currency;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::compute::{totals_with_credit, totals_with_payment};
use crate::billing::types::{Invoice, InvoiceDirection, InvoiceStatus};
use crate::rules::BillingRules;

fn invoice(total_cents: i64) -> Invoice {
    let total = Decimal::new(total_cents, 2);
    Invoice {
        id: InvoiceId::new(),
        direction: InvoiceDirection::Receivable,
        status: InvoiceStatus::Issued,
        currency: Currency::Pln,
        invoice_number: "FV/2026/08/0100".to_string(),
        invoice_date: NaiveDate::from_ymd_opt(2026, 8, 1),
        due_date: None,
        subtotal_amount: total,
        vat_amount: Decimal::ZERO,
        total_amount: total,
        amount_paid: Decimal::ZERO,
        credited_subtotal_amount: Decimal::ZERO,
        credited_total_amount: Decimal::ZERO,
        balance_due: total,
    }
}

/// One ledger step: apply a payment, remove a payment, or credit an amount.
#[derive(Debug, Clone)]
enum Step {
    Pay(Decimal),
    Unpay(Decimal),
    Credit(Decimal),
}

fn step() -> impl Strategy<Value = Step> {
    let cents = 1i64..500_000i64;
    prop_oneof![
        cents.clone().prop_map(|c| Step::Pay(Decimal::new(c, 2))),
        cents.clone().prop_map(|c| Step::Unpay(Decimal::new(c, 2))),
        cents.prop_map(|c| Step::Credit(Decimal::new(c, 2))),
    ]
}

fn apply(invoice: &mut Invoice, step: &Step) {
    let totals = match step {
        Step::Pay(amount) => totals_with_payment(invoice, *amount),
        Step::Unpay(amount) => totals_with_payment(invoice, -*amount),
        Step::Credit(amount) => {
            totals_with_credit(invoice, BillingRules::compute_vat(*amount, Decimal::ZERO).unwrap(), true)
        }
    };
    invoice.amount_paid = totals.amount_paid;
    invoice.credited_subtotal_amount = totals.credited_subtotal;
    invoice.credited_total_amount = totals.credited_total;
    invoice.balance_due = totals.balance_due;
    invoice.status = totals.status;
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// After any sequence of ledger steps, the balance always equals the
    /// epsilon-guarded `total - paid - credited_total`, and the status
    /// agrees with the balance.
    #[test]
    fn prop_balance_is_always_rederivable(
        total_cents in 10_000i64..10_000_000i64,
        steps in proptest::collection::vec(step(), 1..25),
    ) {
        let mut inv = invoice(total_cents);

        for s in &steps {
            apply(&mut inv, s);

            let expected = BillingRules::derive_balance_due(
                inv.total_amount,
                inv.amount_paid,
                inv.credited_total_amount,
            );
            prop_assert_eq!(inv.balance_due, expected);
            prop_assert!(inv.amount_paid >= Decimal::ZERO);
            prop_assert!(inv.credited_total_amount >= Decimal::ZERO);

            if inv.balance_due > Decimal::ZERO
                && (inv.amount_paid + inv.credited_total_amount) > Decimal::ZERO
            {
                prop_assert_eq!(inv.status, InvoiceStatus::PartiallyPaid);
            }
        }
    }

    /// Applying payments only ever moves the balance downward.
    #[test]
    fn prop_payments_decrease_balance_monotonically(
        total_cents in 10_000i64..10_000_000i64,
        amounts in proptest::collection::vec(1i64..200_000i64, 1..15),
    ) {
        let mut inv = invoice(total_cents);
        let mut last_balance = inv.balance_due;

        for cents in amounts {
            apply(&mut inv, &Step::Pay(Decimal::new(cents, 2)));
            prop_assert!(inv.balance_due <= last_balance);
            last_balance = inv.balance_due;
        }
    }
}
