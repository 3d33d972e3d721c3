//! Money rules service.
//!
//! `BillingRules` is a pure, stateless unit struct. Every function takes
//! owned `Decimal` values and returns freshly rounded results, so callers
//! never observe intermediate precision.

use faktura_shared::types::money::{is_effectively_zero, round2};
use rust_decimal::Decimal;

use super::error::RulesError;

/// Subtotal, VAT, and total derived from one base amount and one rate.
///
/// All three fields are rounded to 2 decimal places and satisfy
/// `total == subtotal + vat` exactly, because `total` is computed from the
/// already-rounded parts rather than rounded independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VatBreakdown {
    /// Net amount before tax.
    pub subtotal: Decimal,
    /// Tax amount at the applied rate.
    pub vat: Decimal,
    /// Gross amount, always `subtotal + vat`.
    pub total: Decimal,
}

/// Result of reconciling a requested billing amount against what an order
/// still has available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    /// The amount actually billed after clamping.
    pub billed: Decimal,
    /// True when the billing leaves part of the remaining amount unbilled,
    /// i.e. `billed < remaining`.
    pub is_partial: bool,
}

/// Pure money rules. Stateless by design.
pub struct BillingRules;

impl BillingRules {
    /// Compute a VAT breakdown from a net subtotal and a percentage rate.
    ///
    /// VAT is `round2(subtotal * rate / 100)` with half-up rounding, and the
    /// total is the sum of the rounded parts. Negative subtotals and rates
    /// outside `[0, 100]` are rejected.
    pub fn compute_vat(subtotal: Decimal, rate_percent: Decimal) -> Result<VatBreakdown, RulesError> {
        if subtotal < Decimal::ZERO {
            return Err(RulesError::NegativeAmount(subtotal));
        }
        if rate_percent < Decimal::ZERO || rate_percent > Decimal::ONE_HUNDRED {
            return Err(RulesError::InvalidVatRate(rate_percent));
        }

        let subtotal = round2(subtotal);
        let vat = round2(subtotal * rate_percent / Decimal::ONE_HUNDRED);

        Ok(VatBreakdown {
            subtotal,
            vat,
            total: subtotal + vat,
        })
    }

    /// Reconcile a requested billing amount against an order's remaining
    /// unbilled subtotal.
    ///
    /// Requests above the remaining amount are clamped down, never rejected,
    /// so a stale client view cannot fail a commit that is still meaningful.
    /// Negative requests are user error and are rejected outright.
    pub fn reconcile_override(
        remaining: Decimal,
        requested: Decimal,
    ) -> Result<Reconciled, RulesError> {
        if requested < Decimal::ZERO {
            return Err(RulesError::NegativeAmount(requested));
        }

        let remaining = round2(remaining.max(Decimal::ZERO));
        let requested = round2(requested);
        let billed = requested.min(remaining);

        Ok(Reconciled {
            billed,
            is_partial: billed < remaining,
        })
    }

    /// Derive the outstanding balance of an invoice.
    ///
    /// `total - amount_paid - credited_total`, snapped to exactly zero when
    /// the raw residue is below the settlement epsilon, otherwise rounded.
    /// The epsilon check runs before rounding so a 0.005 residue settles
    /// instead of rounding up to a phantom 0.01 balance. The result may be
    /// negative: overpayment is representable, not an error.
    pub fn derive_balance_due(
        total: Decimal,
        amount_paid: Decimal,
        credited_total: Decimal,
    ) -> Decimal {
        let balance = total - amount_paid - credited_total;
        if is_effectively_zero(balance) {
            Decimal::ZERO
        } else {
            round2(balance)
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    #[rstest]
    #[case(dec!(100.00), dec!(23), dec!(23.00), dec!(123.00))]
    #[case(dec!(0.00), dec!(23), dec!(0.00), dec!(0.00))]
    #[case(dec!(100.00), dec!(0), dec!(0.00), dec!(100.00))]
    #[case(dec!(33.33), dec!(23), dec!(7.67), dec!(41.00))]
    #[case(dec!(1234.56), dec!(8), dec!(98.76), dec!(1333.32))]
    fn compute_vat_rounds_half_up(
        #[case] subtotal: Decimal,
        #[case] rate: Decimal,
        #[case] expected_vat: Decimal,
        #[case] expected_total: Decimal,
    ) {
        let breakdown = BillingRules::compute_vat(subtotal, rate).unwrap();
        assert_eq!(breakdown.vat, expected_vat);
        assert_eq!(breakdown.total, expected_total);
        assert_eq!(breakdown.total, breakdown.subtotal + breakdown.vat);
    }

    #[test]
    fn compute_vat_midpoint_rounds_away_from_zero() {
        // 0.50 * 23% = 0.115, half-up gives 0.12 (banker's would give 0.12
        // here too, so use 0.1050 -> banker's 0.10, half-up 0.11).
        let breakdown = BillingRules::compute_vat(dec!(10.50), dec!(1)).unwrap();
        assert_eq!(breakdown.vat, dec!(0.11));
    }

    #[test]
    fn compute_vat_rejects_negative_subtotal() {
        let err = BillingRules::compute_vat(dec!(-1.00), dec!(23)).unwrap_err();
        assert_eq!(err, RulesError::NegativeAmount(dec!(-1.00)));
    }

    #[rstest]
    #[case(dec!(-0.01))]
    #[case(dec!(100.01))]
    fn compute_vat_rejects_out_of_range_rate(#[case] rate: Decimal) {
        let err = BillingRules::compute_vat(dec!(100.00), rate).unwrap_err();
        assert_eq!(err, RulesError::InvalidVatRate(rate));
    }

    #[rstest]
    #[case(dec!(500.00), dec!(200.00), dec!(200.00), true)] // 300 left unbilled
    #[case(dec!(500.00), dec!(500.00), dec!(500.00), false)]
    #[case(dec!(500.00), dec!(700.00), dec!(500.00), false)] // clamped, order fully billed
    #[case(dec!(0.00), dec!(100.00), dec!(0.00), false)]
    fn reconcile_override_clamps_to_remaining(
        #[case] remaining: Decimal,
        #[case] requested: Decimal,
        #[case] expected: Decimal,
        #[case] partial: bool,
    ) {
        let reconciled = BillingRules::reconcile_override(remaining, requested).unwrap();
        assert_eq!(reconciled.billed, expected);
        assert_eq!(reconciled.is_partial, partial);
    }

    #[test]
    fn reconcile_override_rejects_negative_request() {
        let err = BillingRules::reconcile_override(dec!(500.00), dec!(-10.00)).unwrap_err();
        assert_eq!(err, RulesError::NegativeAmount(dec!(-10.00)));
    }

    #[test]
    fn reconcile_override_treats_negative_remaining_as_zero() {
        let reconciled = BillingRules::reconcile_override(dec!(-5.00), dec!(10.00)).unwrap();
        assert_eq!(reconciled.billed, Decimal::ZERO);
        assert!(!reconciled.is_partial);
    }

    #[rstest]
    #[case(dec!(123.00), dec!(123.00), dec!(0.00), dec!(0.00))]
    #[case(dec!(123.00), dec!(122.995), dec!(0.00), dec!(0.00))] // sub-epsilon residue
    #[case(dec!(123.00), dec!(100.00), dec!(0.00), dec!(23.00))]
    #[case(dec!(123.00), dec!(150.00), dec!(0.00), dec!(-27.00))] // overpaid
    #[case(dec!(123.00), dec!(100.00), dec!(23.00), dec!(0.00))]
    fn derive_balance_due_snaps_epsilon_to_zero(
        #[case] total: Decimal,
        #[case] paid: Decimal,
        #[case] credited: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(BillingRules::derive_balance_due(total, paid, credited), expected);
    }
}
