//! Property-based tests for view store insertion.
//!
//! - Insert idempotence: re-inserting a primary key never changes lengths
//! - Sort stability: a sorted store stays sorted under arbitrary inserts

use std::cmp::Ordering;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::sort::{SortConfig, SortDirection, compare};
use crate::store::tests::TestRow;
use crate::store::{Projected, ViewStore};

/// Strategy for row totals (0.00 to 10,000.00).
fn total() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for optional issue dates within one year.
fn issued_on() -> impl Strategy<Value = Option<NaiveDate>> {
    proptest::option::of((1u32..=28, 1u32..=12).prop_map(|(d, m)| {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }))
}

/// Strategy for a full test row.
fn test_row() -> impl Strategy<Value = TestRow> {
    ("[A-Z]{2}-[0-9]{3}", issued_on(), total()).prop_map(|(number, issued_on, total)| TestRow {
        id: Uuid::now_v7(),
        number,
        issued_on,
        total,
    })
}

fn direction() -> impl Strategy<Value = SortDirection> {
    prop_oneof![
        Just(SortDirection::Ascending),
        Just(SortDirection::Descending)
    ]
}

fn sort_field() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("number"), Just("issued_on"), Just("total")]
}

fn is_sorted(store: &ViewStore<TestRow>, config: &SortConfig) -> bool {
    store.rows().windows(2).all(|pair| {
        compare(
            &pair[0].sort_key(&config.field),
            &pair[1].sort_key(&config.field),
            config.direction,
        ) != Ordering::Greater
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any sequence of inserts into a store with a known sort config,
    /// the store remains sorted by that config after every insert.
    #[test]
    fn prop_sorted_store_stays_sorted(
        rows in proptest::collection::vec(test_row(), 1..40),
        field in sort_field(),
        dir in direction(),
    ) {
        let config = SortConfig::new(field, dir);
        let mut store = ViewStore::new(Some(config.clone()), 30);

        for row in &rows {
            store.insert(row);
            prop_assert!(is_sorted(&store, &config), "store lost sort order");
        }
    }

    /// Inserting the same record twice leaves the store length unchanged
    /// after the second call.
    #[test]
    fn prop_insert_is_idempotent(
        rows in proptest::collection::vec(test_row(), 1..20),
        field in sort_field(),
        dir in direction(),
    ) {
        let mut store = ViewStore::new(Some(SortConfig::new(field, dir)), 30);
        for row in &rows {
            store.insert(row);
        }
        let len = store.len();

        for row in &rows {
            store.insert(row);
            prop_assert_eq!(store.len(), len);
        }
    }

    /// Removing then reinserting a record keeps exactly one copy and
    /// preserves sortedness.
    #[test]
    fn prop_remove_then_reinsert_keeps_single_copy(
        rows in proptest::collection::vec(test_row(), 2..20),
        field in sort_field(),
        dir in direction(),
    ) {
        let config = SortConfig::new(field, dir);
        let mut store = ViewStore::new(Some(config.clone()), 30);
        for row in &rows {
            store.insert(row);
        }

        let target = &rows[0];
        store.remove(target.id());
        store.insert(target);

        let copies = store.rows().iter().filter(|r| r.id() == target.id()).count();
        prop_assert_eq!(copies, 1);
        prop_assert!(is_sorted(&store, &config));
    }
}
