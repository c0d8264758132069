// Key group filter tests
// Author: Gabriel Demetrios Lafis

mod common;

use common::{rows_of, table};
use rust_table_stream_engine::{
    data::{DataError, DataSet, Table, Value},
    processing::{conflicts, duplicates, merge, merge_group, TableExt},
    row, KeySpec,
};

fn sample() -> DataSet {
    table(
        ["foo", "bar", "baz"],
        vec![
            row!["A", 1, 2.0],
            row!["B", 2, 3.4],
            row!["D", 6, 9.3],
            row!["B", 3, 7.8],
            row!["B", 2, 12.3],
            row!["E", Value::Null, 1.3],
            row!["D", 4, 14.5],
        ],
    )
}

#[test]
fn test_duplicates_by_key() {
    let result = DataSet::from_table(&duplicates(sample(), "foo", false)).unwrap();

    // Key order, input order within each key
    assert_eq!(result.header.fields, vec!["foo", "bar", "baz"]);
    assert_eq!(
        result.data,
        vec![
            row!["B", 2, 3.4],
            row!["B", 3, 7.8],
            row!["B", 2, 12.3],
            row!["D", 6, 9.3],
            row!["D", 4, 14.5],
        ]
    );
}

#[test]
fn test_duplicates_by_compound_key() {
    let result = rows_of(&duplicates(sample(), ["foo", "bar"], false));

    assert_eq!(result, vec![row!["B", 2, 3.4], row!["B", 2, 12.3]]);
}

#[test]
fn test_duplicates_by_whole_row() {
    let data = table(
        ["a", "b"],
        vec![row![1, "x"], row![2, "y"], row![1, "x"], row![1, "y"]],
    );

    let result = rows_of(&data.duplicates(KeySpec::empty()));

    assert_eq!(result, vec![row![1, "x"], row![1, "x"]]);
}

#[test]
fn test_duplicates_with_unique_keys_is_empty() {
    let data = table(["k"], vec![row![1], row![2], row![3]]);
    assert!(rows_of(&duplicates(data, 0usize, false)).is_empty());
}

#[test]
fn test_conflicts_by_key() {
    let data = table(
        ["foo", "bar", "baz"],
        vec![
            row!["A", 1, 2.7],
            row!["B", 2, Value::Null],
            row!["D", 3, 9.4],
            row!["B", Value::Null, 7.8],
            row!["E", Value::Null],
            row!["D", 3, 12.3],
            row!["A", 2, Value::Null],
        ],
    );

    let result = rows_of(&conflicts(data, "foo", Value::Null, false));

    // B only disagrees where one side is missing
    assert_eq!(
        result,
        vec![
            row!["A", 1, 2.7],
            row!["A", 2, Value::Null],
            row!["D", 3, 9.4],
            row!["D", 3, 12.3],
        ]
    );
}

#[test]
fn test_conflicts_with_custom_missing() {
    let data = table(
        ["k", "v"],
        vec![row![1, "?"], row![1, "a"], row![2, "b"], row![2, "c"]],
    );

    let result = rows_of(&conflicts(data, "k", Value::from("?"), false));

    assert_eq!(result, vec![row![2, "b"], row![2, "c"]]);
}

#[test]
fn test_conflicting_group_is_emitted_whole() {
    // The conflict sits between the second and third rows only
    let data = table(
        ["k", "v"],
        vec![row!["y", 5], row!["x", 1], row!["x", 1], row!["x", 2]],
    );

    let result = rows_of(&conflicts(data, "k", Value::Null, false));

    assert_eq!(result, vec![row!["x", 1], row!["x", 1], row!["x", 2]]);
}

#[test]
fn test_conflicting_group_is_emitted_once() {
    // Both adjacent pairs of x conflict
    let data = table(
        ["k", "v"],
        vec![row!["x", 1], row!["x", 2], row!["x", 3], row!["y", 1]],
    );

    let result = rows_of(&conflicts(data, "k", Value::Null, false));

    assert_eq!(result, vec![row!["x", 1], row!["x", 2], row!["x", 3]]);
}

#[test]
fn test_conflicts_compare_adjacent_rows_only() {
    // 1 and 2 disagree, but a missing value sits between them
    let data = table(
        ["k", "v"],
        vec![row!["x", 1], row!["x", Value::Null], row!["x", 2]],
    );

    let result = rows_of(&conflicts(data, "k", Value::Null, true));

    assert!(result.is_empty());
}

#[test]
fn test_conflicts_with_unique_keys_is_empty() {
    assert!(rows_of(&sample().conflicts(["foo", "bar", "baz"])).is_empty());
}

#[test]
fn test_merge_one_row_per_key() {
    let data = table(
        ["foo", "bar", "baz"],
        vec![
            row!["B", Value::Null, 7.8],
            row!["A", 1, 2.7],
            row!["C", 5, Value::Null],
            row!["B", 2, Value::Null],
        ],
    );

    let result = DataSet::from_table(&merge(data, "foo", Value::Null, false)).unwrap();

    assert_eq!(result.header.fields, vec!["foo", "bar", "baz"]);
    assert_eq!(
        result.data,
        vec![row!["A", 1, 2.7], row!["B", 2, 7.8], row!["C", 5, Value::Null]]
    );
}

#[test]
fn test_merge_later_values_win() {
    let data = table(
        ["k", "v"],
        vec![row![1, "first"], row![1, "second"], row![1, Value::Null]],
    );

    let result = rows_of(&data.merge_rows("k"));

    assert_eq!(result, vec![row![1, "second"]]);
}

#[test]
fn test_merge_group_takes_latest_row_length() {
    let rows = vec![row![1, "a", "b"], row![1, Value::Null]];
    assert_eq!(merge_group(&rows, &Value::Null), Some(row![1, "a"]));

    let rows = vec![row![1], row![1, Value::Null, "c"]];
    assert_eq!(
        merge_group(&rows, &Value::Null),
        Some(row![1, Value::Null, "c"])
    );

    assert_eq!(merge_group(&[], &Value::Null), None);
}

#[test]
fn test_short_row_fails_key_projection() {
    let data = table(["a", "b"], vec![row![1, 2], row![3]]);
    let view = duplicates(data, "b", true);

    let mut rows = view.open().unwrap();
    match rows.next() {
        Some(Err(DataError::RowTooShort { index, len })) => {
            assert_eq!(index, 1);
            assert_eq!(len, 1);
        }
        other => panic!("expected RowTooShort, got {:?}", other),
    }
    assert!(rows.next().is_none());
}

#[test]
fn test_unknown_key_fails_on_open() {
    let view = merge(sample(), "qux", Value::Null, false);
    assert!(matches!(view.open(), Err(DataError::FieldNotFound(_))));
}
