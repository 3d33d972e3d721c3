//! Money rounding helpers and currency codes.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All monetary values are base-currency `rust_decimal::Decimal` amounts
//! rounded to 2 decimal places, never integer minor units.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rounding epsilon for balances: amounts below 0.01 of a currency unit
/// are treated as zero.
pub const BALANCE_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds an amount half-up to 2 decimal places.
///
/// This is the single rounding policy for every derived monetary field.
/// Repeated rounding on edited fields is the main source of cross-field
/// drift, so callers must never round any other way.
#[must_use]
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true if the amount is within [`BALANCE_EPSILON`] of zero.
#[must_use]
pub fn is_effectively_zero(amount: Decimal) -> bool {
    amount.abs() < BALANCE_EPSILON
}

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Polish Zloty
    Pln,
    /// Euro
    Eur,
    /// US Dollar
    Usd,
    /// British Pound
    Gbp,
    /// Czech Koruna
    Czk,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pln => write!(f, "PLN"),
            Self::Eur => write!(f, "EUR"),
            Self::Usd => write!(f, "USD"),
            Self::Gbp => write!(f, "GBP"),
            Self::Czk => write!(f, "CZK"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PLN" => Ok(Self::Pln),
            "EUR" => Ok(Self::Eur),
            "USD" => Ok(Self::Usd),
            "GBP" => Ok(Self::Gbp),
            "CZK" => Ok(Self::Czk),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}
