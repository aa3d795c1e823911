//! Property-based tests for table alignment.
//!
//! ```bash
//! PROPTEST_CASES=10000 cargo test --test property_tests
//! ```

use proptest::prelude::*;

use hype_rs::align::align_and_merge;
use hype_rs::config::TableSpec;
use hype_rs::{Column, HypeError, Table, Value};

// =============================================================================
// Test Strategies
// =============================================================================

/// Distinct subbasin ids with a distinct upstream area each, plus two
/// independent row orders in which two tables list them.
fn subbasins() -> impl Strategy<Value = (Vec<i64>, Vec<usize>, Vec<usize>)> {
    prop::collection::hash_set(1i64..10_000, 1..40).prop_flat_map(|ids| {
        let ids: Vec<i64> = ids.into_iter().collect();
        let order: Vec<usize> = (0..ids.len()).collect();
        (
            Just(ids),
            Just(order.clone()).prop_shuffle(),
            Just(order).prop_shuffle(),
        )
    })
}

fn listed(ids: &[i64], order: &[usize], id_name: &str, value_name: &str) -> Table {
    let id_values = order.iter().map(|&i| Value::Int(ids[i])).collect();
    let values = order.iter().map(|&i| Value::Int(ids[i] * 10)).collect();
    Table::from_columns(vec![
        Column::new(id_name, id_values),
        Column::new(value_name, values),
    ])
    .unwrap()
}

fn with_area(ids: &[i64], order: &[usize]) -> Table {
    let mut table = listed(ids, order, "id2", "elev");
    // upstream area decreases with id so the output order is reversed
    let area = order
        .iter()
        .map(|&i| Value::Float(1.0e6 - ids[i] as f64))
        .collect();
    table.push_column(Column::new("up_area", area)).unwrap();
    table
}

fn specs() -> Vec<TableSpec> {
    vec![
        TableSpec::new(Some("id1"), None),
        TableSpec::new(Some("id2"), None),
    ]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn aligned_tables_merge_row_for_row((ids, first, second) in subbasins()) {
        let tables = vec![listed(&ids, &first, "id1", "slope"), with_area(&ids, &second)];
        let merged = align_and_merge(tables, &specs(), "up_area").unwrap();

        prop_assert_eq!(merged.n_rows(), ids.len());
        prop_assert_eq!(merged.column_names(), vec!["slope".to_string(), "elev".to_string()]);

        let mut expected: Vec<i64> = ids.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        let slope: Vec<Value> = expected.iter().map(|id| Value::Int(id * 10)).collect();
        prop_assert_eq!(&merged.column("slope").unwrap().values, &slope);
        prop_assert_eq!(&merged.column("elev").unwrap().values, &slope);
    }

    #[test]
    fn differing_id_sets_never_merge(
        (ids, first, second) in subbasins(),
        extra in 10_000i64..20_000,
    ) {
        let mut other_ids = ids.clone();
        other_ids[second[0]] = extra;
        let tables = vec![listed(&ids, &first, "id1", "slope"), with_area(&other_ids, &second)];
        let result = align_and_merge(tables, &specs(), "up_area");
        prop_assert!(
            matches!(result, Err(HypeError::IndexMismatch { .. })),
            "expected an index mismatch"
        );
    }
}
