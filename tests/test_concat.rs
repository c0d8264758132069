// Concatenation tests
// Author: Gabriel Demetrios Lafis

mod common;

use std::rc::Rc;

use common::{table, Tracker, TrackedTable};
use rust_table_stream_engine::{
    data::{DataSet, Table, TableRef, Value},
    processing::cat,
    row,
};

#[test]
fn test_cat_with_matching_headers() {
    let a: TableRef = Rc::new(table(["k", "v"], vec![row![1, "a"]]));
    let b: TableRef = Rc::new(table(["k", "v"], vec![row![2, "b"], row![3, "c"]]));

    let result = DataSet::from_table(&cat(vec![a, b], Value::Null)).unwrap();

    assert_eq!(result.header.fields, vec!["k", "v"]);
    assert_eq!(result.data, vec![row![1, "a"], row![2, "b"], row![3, "c"]]);
}

#[test]
fn test_cat_lays_out_rows_by_name() {
    let a: TableRef = Rc::new(table(["foo", "bar"], vec![row![1, "A"], row![2]]));
    let b: TableRef = Rc::new(table(["bar", "baz"], vec![row!["B", true]]));

    let result = DataSet::from_table(&cat(vec![a, b], Value::from("-"))).unwrap();

    // Union of fields in order of first appearance
    assert_eq!(result.header.fields, vec!["foo", "bar", "baz"]);
    assert_eq!(
        result.data,
        vec![row![1, "A", "-"], row![2, "-", "-"], row!["-", "B", true]]
    );
}

#[test]
fn test_cat_of_nothing_is_empty() {
    let result = DataSet::from_table(&cat(Vec::new(), Value::Null)).unwrap();

    assert!(result.header.is_empty());
    assert!(result.is_empty());
}

#[test]
fn test_cat_releases_each_input() {
    let tracker = Tracker::new();
    let a: TableRef = Rc::new(TrackedTable::new(table(["k"], vec![row![1]]), &tracker));
    let b: TableRef = Rc::new(TrackedTable::new(table(["k"], vec![row![2]]), &tracker));
    let view = cat(vec![a, b], Value::Null);

    let mut rows = view.open().unwrap();
    assert_eq!(tracker.opened(), 2);
    assert_eq!(rows.next().unwrap().unwrap(), row![1]);
    assert_eq!(rows.next().unwrap().unwrap(), row![2]);

    // The first input is gone once the second is reached
    assert_eq!(tracker.released(), 1);
    assert!(rows.next().is_none());
    assert!(tracker.balanced());
}
