// Set operations between two tables
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;
use std::rc::Rc;

use log::debug;

use crate::data::{DataError, KeySpec, Row, RowIter, Rows, Table, TableRef};
use super::sort_by;

/// Rows of one table that are not in another
///
/// Both inputs must be sorted by whole row. Matching rows cancel one for one,
/// so a row occurring `n` times in `a` and `m` times in `b` appears
/// `max(0, n - m)` times in the output. The output header is `a`'s header.
#[derive(Clone)]
pub struct ComplementView {
    a: TableRef,
    b: TableRef,
}

impl ComplementView {
    /// Create a complement view over two tables already sorted by whole row
    ///
    /// Sortedness is not checked; unsorted input gives wrong output.
    pub fn presorted(a: TableRef, b: TableRef) -> Self {
        ComplementView { a, b }
    }
}

impl std::fmt::Debug for ComplementView {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ComplementView").finish_non_exhaustive()
    }
}

/// Return rows in `a` that are not in `b`
///
/// Unless `presorted` is set, both tables are sorted by whole row first.
pub fn complement<A, B>(a: A, b: B, presorted: bool) -> ComplementView
where
    A: Table + 'static,
    B: Table + 'static,
{
    if presorted {
        ComplementView::presorted(Rc::new(a), Rc::new(b))
    } else {
        ComplementView::presorted(
            Rc::new(sort_by(a, KeySpec::empty(), false)),
            Rc::new(sort_by(b, KeySpec::empty(), false)),
        )
    }
}

/// Find the difference between two tables
///
/// Returns `(added, subtracted)`: rows in `b` not in `a`, and rows in `a` not
/// in `b`. Each keeps the header of the table its rows come from. Both tables
/// are sorted once, and the sorted views are shared by the two outputs.
pub fn diff<A, B>(a: A, b: B, presorted: bool) -> (ComplementView, ComplementView)
where
    A: Table + 'static,
    B: Table + 'static,
{
    let (a, b): (TableRef, TableRef) = if presorted {
        (Rc::new(a), Rc::new(b))
    } else {
        (
            Rc::new(sort_by(a, KeySpec::empty(), false)),
            Rc::new(sort_by(b, KeySpec::empty(), false)),
        )
    };

    let added = ComplementView::presorted(Rc::clone(&b), Rc::clone(&a));
    let subtracted = ComplementView::presorted(a, b);
    (added, subtracted)
}

impl Table for ComplementView {
    fn open(&self) -> Result<Rows<'_>, DataError> {
        let (header, left) = self.a.open()?.into_parts();
        // the header of b is read but never reconciled with a's
        let (other, right) = self.b.open()?.into_parts();
        debug!("complement: {} minus {}", header, other);

        Ok(Rows::new(
            header,
            ComplementRows {
                left,
                right: Some(right),
                current_left: None,
                current_right: None,
            },
        ))
    }
}

/// Lock-step merge of two sorted traversals
struct ComplementRows<'a> {
    left: RowIter<'a>,
    right: Option<RowIter<'a>>,
    current_left: Option<Row>,
    current_right: Option<Row>,
}

impl ComplementRows<'_> {
    /// Current right row, pulling the next one if needed
    fn peek_right(&mut self) -> Result<Option<Row>, DataError> {
        if let Some(row) = self.current_right.take() {
            return Ok(Some(row));
        }
        let Some(right) = self.right.as_mut() else {
            return Ok(None);
        };
        match right.next() {
            Some(row) => row.map(Some),
            None => {
                // b is exhausted: release it, remaining a rows pass through
                self.right = None;
                Ok(None)
            }
        }
    }
}

impl Iterator for ComplementRows<'_> {
    type Item = Result<Row, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let x = match self.current_left.take() {
                Some(row) => row,
                None => match self.left.next() {
                    Some(Ok(row)) => row,
                    Some(Err(err)) => return Some(Err(err)),
                    None => {
                        // a is exhausted: nothing more can be emitted
                        self.right = None;
                        return None;
                    }
                },
            };

            let y = match self.peek_right() {
                Ok(Some(row)) => row,
                Ok(None) => return Some(Ok(x)),
                Err(err) => return Some(Err(err)),
            };

            match x.cmp(&y) {
                Ordering::Less => {
                    self.current_right = Some(y);
                    return Some(Ok(x));
                }
                // one occurrence consumed from each side
                Ordering::Equal => continue,
                Ordering::Greater => self.current_left = Some(x),
            }
        }
    }
}
