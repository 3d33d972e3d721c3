//! Comparator for sorted view-store insertion.
//!
//! Sort fields are dynamic (whatever the view was configured with), so the
//! comparator works over an extracted [`SortKey`] rather than typed fields.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sort direction for a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Sort configuration of one view: field name and direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortConfig {
    /// Field the view is sorted by (e.g. `invoice_date`).
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortConfig {
    /// Creates a sort configuration.
    #[must_use]
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Stable textual key for registry keying.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.field, self.direction)
    }
}

/// A sortable value extracted from a record's field.
///
/// Covers the value families the views sort by: absent values, dates,
/// timestamps, numbers, and text.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    /// Absent value (null/undefined in the view data).
    Null,
    /// Calendar date.
    Date(NaiveDate),
    /// Point in time.
    Timestamp(DateTime<Utc>),
    /// Numeric value.
    Number(Decimal),
    /// Text, compared case-insensitively.
    Text(String),
}

impl SortKey {
    /// Extracts a date key, mapping `None` to [`SortKey::Null`].
    #[must_use]
    pub fn date(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::Null, Self::Date)
    }

    /// Extracts a text key from any displayable value.
    #[must_use]
    pub fn text(value: impl std::fmt::Display) -> Self {
        Self::Text(value.to_string())
    }
}

/// Family rank used for cross-family comparisons. Nulls always rank last
/// (before direction is applied), so they trail an ascending view and lead
/// a descending one.
const fn family_rank(key: &SortKey) -> u8 {
    match key {
        SortKey::Date(_) => 0,
        SortKey::Timestamp(_) => 1,
        SortKey::Number(_) => 2,
        SortKey::Text(_) => 3,
        SortKey::Null => 4,
    }
}

/// Compares two sort keys under the given direction.
///
/// Within a family: dates and timestamps compare chronologically, numbers
/// numerically, text case-insensitively. Mixed families fall back to a fixed
/// family order so the result is still a total order. Descending reverses
/// everything, which is what pushes nulls to the opposite edge.
#[must_use]
pub fn compare(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
    let ordering = match (a, b) {
        (SortKey::Date(x), SortKey::Date(y)) => x.cmp(y),
        (SortKey::Timestamp(x), SortKey::Timestamp(y)) => x.cmp(y),
        (SortKey::Number(x), SortKey::Number(y)) => x.cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        _ => family_rank(a).cmp(&family_rank(b)),
    };

    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}
