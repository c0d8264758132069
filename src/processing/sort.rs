// Sort operations for table streams
// Author: Gabriel Demetrios Lafis

use std::mem;

use log::debug;

use crate::data::{DataError, KeyProjection, KeySpec, Row, RowIter, Rows, Table};

/// A view of a table sorted by a key
///
/// Sorting drains the whole upstream traversal into memory the first time a
/// data row is pulled. The sort is stable, so rows with equal keys keep their
/// input order in both directions.
#[derive(Debug, Clone)]
pub struct SortView<T> {
    source: T,
    key: KeySpec,
    reverse: bool,
}

impl<T: Table> SortView<T> {
    /// Create a sort view; an empty key sorts by whole row
    pub fn new(source: T, key: impl Into<KeySpec>, reverse: bool) -> Self {
        SortView {
            source,
            key: key.into(),
            reverse,
        }
    }

    /// The upstream table
    pub fn source(&self) -> &T {
        &self.source
    }
}

/// Sort a table by a key, ascending unless `reverse` is set
pub fn sort_by<T: Table>(source: T, key: impl Into<KeySpec>, reverse: bool) -> SortView<T> {
    SortView::new(source, key, reverse)
}

impl<T: Table> Table for SortView<T> {
    fn open(&self) -> Result<Rows<'_>, DataError> {
        let (header, rows) = self.source.open()?.into_parts();
        let projection = KeyProjection::resolve(&header, &self.key)?;
        debug!(
            "sort: key {:?}, reverse {} over header {}",
            projection, self.reverse, header
        );
        Ok(Rows::new(
            header,
            SortedRows::new(rows, projection, self.reverse),
        ))
    }
}

/// Rows of one traversal, sorted on first pull
pub(crate) struct SortedRows<'a> {
    state: SortState<'a>,
}

enum SortState<'a> {
    Pending {
        rows: RowIter<'a>,
        projection: KeyProjection,
        reverse: bool,
    },
    Sorted(std::vec::IntoIter<Row>),
    Done,
}

impl<'a> SortedRows<'a> {
    pub(crate) fn new(rows: RowIter<'a>, projection: KeyProjection, reverse: bool) -> Self {
        SortedRows {
            state: SortState::Pending {
                rows,
                projection,
                reverse,
            },
        }
    }
}

impl Iterator for SortedRows<'_> {
    type Item = Result<Row, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, SortState::Pending { .. }) {
            if let SortState::Pending {
                rows,
                projection,
                reverse,
            } = mem::replace(&mut self.state, SortState::Done)
            {
                // the upstream traversal is released once drained
                match sort_rows(rows, &projection, reverse) {
                    Ok(sorted) => self.state = SortState::Sorted(sorted.into_iter()),
                    Err(err) => return Some(Err(err)),
                }
            }
        }

        match &mut self.state {
            SortState::Sorted(sorted) => sorted.next().map(Ok),
            _ => None,
        }
    }
}

/// Drain rows and stable-sort them by key
fn sort_rows(
    rows: RowIter<'_>,
    projection: &KeyProjection,
    reverse: bool,
) -> Result<Vec<Row>, DataError> {
    let sorted = match projection {
        KeyProjection::WholeRow => {
            let mut rows = rows.collect::<Result<Vec<_>, _>>()?;
            if reverse {
                rows.sort_by(|a, b| b.cmp(a));
            } else {
                rows.sort();
            }
            rows
        }
        KeyProjection::Positions(_) => {
            let mut keyed = Vec::new();
            for row in rows {
                let row = row?;
                keyed.push((projection.project(&row)?, row));
            }
            if reverse {
                keyed.sort_by(|(a, _), (b, _)| b.cmp(a));
            } else {
                keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
            }
            keyed.into_iter().map(|(_, row)| row).collect()
        }
    };

    debug!("sort: sorted {} rows", sorted.len());
    Ok(sorted)
}
