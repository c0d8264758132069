// Shared test helpers
// Author: Gabriel Demetrios Lafis

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use rust_table_stream_engine::data::{DataError, DataSet, Header, Row, Rows, Table};

/// Counts traversals opened and released
#[derive(Debug, Default)]
pub struct Tracker {
    pub opened: Cell<usize>,
    pub released: Cell<usize>,
}

impl Tracker {
    pub fn new() -> Rc<Self> {
        Rc::new(Tracker::default())
    }

    pub fn opened(&self) -> usize {
        self.opened.get()
    }

    pub fn released(&self) -> usize {
        self.released.get()
    }

    /// Every opened traversal has been released exactly once
    pub fn balanced(&self) -> bool {
        self.opened.get() == self.released.get()
    }
}

/// Released when the traversal holding it is dropped
struct ReleaseGuard {
    tracker: Rc<Tracker>,
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.tracker.released.set(self.tracker.released.get() + 1);
    }
}

/// A collaborator table that records opening and release of traversals
///
/// When `fail_at` is set, the traversal yields an error instead of the row at
/// that index.
pub struct TrackedTable {
    pub data: DataSet,
    pub tracker: Rc<Tracker>,
    pub fail_at: Option<usize>,
}

impl TrackedTable {
    pub fn new(data: DataSet, tracker: &Rc<Tracker>) -> Self {
        TrackedTable {
            data,
            tracker: Rc::clone(tracker),
            fail_at: None,
        }
    }

    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }
}

impl Table for TrackedTable {
    fn open(&self) -> Result<Rows<'_>, DataError> {
        self.tracker.opened.set(self.tracker.opened.get() + 1);
        let guard = ReleaseGuard {
            tracker: Rc::clone(&self.tracker),
        };
        let fail_at = self.fail_at;

        let rows = self.data.data.iter().enumerate().map(move |(i, row)| {
            let _held = &guard;
            if Some(i) == fail_at {
                Err(DataError::Schema(format!("upstream failure at row {}", i)))
            } else {
                Ok(row.clone())
            }
        });
        Ok(Rows::new(self.data.header.clone(), rows))
    }
}

/// Build a dataset from a header and rows
pub fn table<H: Into<Header>>(header: H, rows: Vec<Row>) -> DataSet {
    DataSet::from_rows(header, rows)
}

/// Collect every row of one traversal, panicking on error
pub fn rows_of<T: Table + ?Sized>(table: &T) -> Vec<Row> {
    DataSet::from_table(table).unwrap().data
}
