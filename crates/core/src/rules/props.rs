//! Property-based tests for the money rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::BillingRules;

/// Subtotals from 50.00 to 100,000.00. Below ~50 the VAT rounding error is
/// a meaningful share of the amount and back-derivation is not expected to
/// round-trip exactly.
fn subtotal() -> impl Strategy<Value = Decimal> {
    (5_000i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Whole-percent VAT rates actually used in practice.
fn vat_rate() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        Just(Decimal::from(5)),
        Just(Decimal::from(8)),
        Just(Decimal::from(23)),
    ]
}

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The gross total always equals the sum of the rounded parts, and
    /// deriving the subtotal back from the total lands on the original
    /// subtotal for realistic amounts.
    #[test]
    fn prop_vat_breakdown_is_consistent(subtotal in subtotal(), rate in vat_rate()) {
        let breakdown = BillingRules::compute_vat(subtotal, rate).unwrap();

        prop_assert_eq!(breakdown.total, breakdown.subtotal + breakdown.vat);
        prop_assert!(breakdown.vat >= Decimal::ZERO);

        // Reversing the VAT recovers the rate within 0.01.
        let recovered_rate = breakdown.vat / breakdown.subtotal * Decimal::ONE_HUNDRED;
        prop_assert!(
            (recovered_rate - rate).abs() <= Decimal::new(1, 2),
            "recovered rate {} vs original {}",
            recovered_rate,
            rate
        );

        // Back-derive net from gross at the same rate.
        let factor = Decimal::ONE + rate / Decimal::ONE_HUNDRED;
        let derived = faktura_shared::types::money::round2(breakdown.total / factor);
        prop_assert!(
            (derived - subtotal).abs() <= Decimal::new(1, 2),
            "derived {} vs original {}",
            derived,
            subtotal
        );
    }

    /// Clamping is idempotent: reconciling the already-billed amount against
    /// the same remaining changes nothing.
    #[test]
    fn prop_reconcile_is_idempotent(remaining in amount(), requested in amount()) {
        let first = BillingRules::reconcile_override(remaining, requested).unwrap();
        let second = BillingRules::reconcile_override(remaining, first.billed).unwrap();

        prop_assert_eq!(second, first);
    }

    /// Requesting any amount past the remaining clamps to exactly the
    /// remaining, leaving the order fully billed.
    #[test]
    fn prop_overshoot_clamps_to_full_remaining(
        remaining in amount(),
        excess in (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2)),
    ) {
        let reconciled =
            BillingRules::reconcile_override(remaining, remaining + excess).unwrap();

        prop_assert_eq!(reconciled.billed, remaining);
        prop_assert!(!reconciled.is_partial);
    }

    /// The billed amount never exceeds either input.
    #[test]
    fn prop_reconcile_never_exceeds_inputs(remaining in amount(), requested in amount()) {
        let reconciled = BillingRules::reconcile_override(remaining, requested).unwrap();

        prop_assert!(reconciled.billed <= remaining.max(Decimal::ZERO));
        prop_assert!(reconciled.billed <= requested);
        prop_assert!(reconciled.billed >= Decimal::ZERO);
    }
}
