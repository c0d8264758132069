// Key-grouped filters over sorted tables
// Author: Gabriel Demetrios Lafis

use std::rc::Rc;

use log::debug;

use crate::data::{DataError, Header, KeyProjection, KeySpec, Row, RowIter, Rows, Table, TableRef, Value};
use super::sort_by;

/// A maximal run of adjacent rows sharing the same key projection
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: Vec<Value>,
    pub rows: Vec<Row>,
}

impl Group {
    /// Number of rows in the group
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the group has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Groups adjacent equal-key rows of a sorted traversal
pub(crate) struct Groups<'a> {
    rows: RowIter<'a>,
    projection: KeyProjection,
    pending: Option<(Vec<Value>, Row)>,
    done: bool,
}

impl<'a> Groups<'a> {
    pub(crate) fn new(rows: RowIter<'a>, projection: KeyProjection) -> Self {
        Groups {
            rows,
            projection,
            pending: None,
            done: false,
        }
    }

    /// Pull the next row with its key
    fn pull(&mut self) -> Option<Result<(Vec<Value>, Row), DataError>> {
        let row = match self.rows.next()? {
            Ok(row) => row,
            Err(err) => return Some(Err(err)),
        };
        Some(self.projection.project(&row).map(|key| (key, row)))
    }
}

impl Iterator for Groups<'_> {
    type Item = Result<Group, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let (key, first) = match self.pending.take().map(Ok).or_else(|| self.pull()) {
            Some(Ok(entry)) => entry,
            Some(Err(err)) => {
                self.done = true;
                return Some(Err(err));
            }
            None => {
                self.done = true;
                return None;
            }
        };

        let mut rows = vec![first];
        loop {
            match self.pull() {
                Some(Ok((next_key, row))) if next_key == key => rows.push(row),
                Some(Ok(entry)) => {
                    self.pending = Some(entry);
                    break;
                }
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }

        Some(Ok(Group { key, rows }))
    }
}

/// Sort unless the caller asserts the input is already sorted by the key
fn sorted_source<T: Table + 'static>(source: T, key: &KeySpec, presorted: bool) -> TableRef {
    if presorted {
        Rc::new(source)
    } else {
        Rc::new(sort_by(source, key.clone(), false))
    }
}

/// Open a sorted source and group its rows by key
fn open_groups<'a>(source: &'a TableRef, key: &KeySpec) -> Result<(Header, Groups<'a>), DataError> {
    let (header, rows) = source.open()?.into_parts();
    let projection = KeyProjection::resolve(&header, key)?;
    Ok((header, Groups::new(rows, projection)))
}

/// Flatten selected groups back into rows
fn group_rows(group: Result<Group, DataError>) -> Vec<Result<Row, DataError>> {
    match group {
        Ok(group) => group.rows.into_iter().map(Ok).collect(),
        Err(err) => vec![Err(err)],
    }
}

/// Check if two rows disagree at a position where neither value is missing
fn rows_conflict(a: &Row, b: &Row, missing: &Value) -> bool {
    a.values
        .iter()
        .zip(b.values.iter())
        .any(|(x, y)| x != missing && y != missing && x != y)
}

/// Fold a group into one row, the latest non-missing value winning per column
///
/// The merged row takes the length of the latest row; a position the running
/// row does not reach takes the incoming value even when it is missing.
pub fn merge_group(rows: &[Row], missing: &Value) -> Option<Row> {
    let (first, rest) = rows.split_first()?;
    let merged = rest.iter().fold(first.clone(), |previous, row| {
        let values = row
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                if v != missing {
                    v.clone()
                } else {
                    previous.get(i).unwrap_or(v).clone()
                }
            })
            .collect();
        Row::new(values)
    });
    Some(merged)
}

/// Rows whose key occurs more than once
#[derive(Clone)]
pub struct DuplicatesView {
    source: TableRef,
    key: KeySpec,
}

/// Select rows with duplicate values under a key, in key order
///
/// An empty key compares whole rows.
pub fn duplicates<T: Table + 'static>(source: T, key: impl Into<KeySpec>, presorted: bool) -> DuplicatesView {
    let key = key.into();
    DuplicatesView {
        source: sorted_source(source, &key, presorted),
        key,
    }
}

impl Table for DuplicatesView {
    fn open(&self) -> Result<Rows<'_>, DataError> {
        let (header, groups) = open_groups(&self.source, &self.key)?;
        debug!("duplicates: key {:?} over header {}", self.key, header);

        let rows = groups
            .filter(|group| group.as_ref().map_or(true, |g| g.len() > 1))
            .flat_map(group_rows);
        Ok(Rows::new(header, rows))
    }
}

/// Rows of key groups holding conflicting values
#[derive(Clone)]
pub struct ConflictsView {
    source: TableRef,
    key: KeySpec,
    missing: Value,
}

/// Select key groups in which some adjacent pair of rows conflicts
///
/// Two rows conflict when, at some position both reach, neither value equals
/// `missing` and the values differ. Only adjacent rows of a group are
/// compared, so in groups of three or more rows a conflict between
/// non-adjacent rows alone goes unreported.
pub fn conflicts<T: Table + 'static>(
    source: T,
    key: impl Into<KeySpec>,
    missing: Value,
    presorted: bool,
) -> ConflictsView {
    let key = key.into();
    ConflictsView {
        source: sorted_source(source, &key, presorted),
        key,
        missing,
    }
}

impl Table for ConflictsView {
    fn open(&self) -> Result<Rows<'_>, DataError> {
        let (header, groups) = open_groups(&self.source, &self.key)?;
        debug!("conflicts: key {:?} over header {}", self.key, header);

        let missing = self.missing.clone();
        let rows = groups
            .filter(move |group| match group {
                Ok(group) => group
                    .rows
                    .windows(2)
                    .any(|pair| rows_conflict(&pair[0], &pair[1], &missing)),
                Err(_) => true,
            })
            .flat_map(group_rows);
        Ok(Rows::new(header, rows))
    }
}

/// One merged row per key
#[derive(Clone)]
pub struct MergeView {
    source: TableRef,
    key: KeySpec,
    missing: Value,
}

/// Merge rows sharing a key into one row per key, in key order
///
/// See [`merge_group`] for the per-column rule.
pub fn merge<T: Table + 'static>(
    source: T,
    key: impl Into<KeySpec>,
    missing: Value,
    presorted: bool,
) -> MergeView {
    let key = key.into();
    MergeView {
        source: sorted_source(source, &key, presorted),
        key,
        missing,
    }
}

impl Table for MergeView {
    fn open(&self) -> Result<Rows<'_>, DataError> {
        let (header, groups) = open_groups(&self.source, &self.key)?;
        debug!("merge: key {:?} over header {}", self.key, header);

        let missing = self.missing.clone();
        let rows = groups.filter_map(move |group| match group {
            Ok(group) => merge_group(&group.rows, &missing).map(Ok),
            Err(err) => Some(Err(err)),
        });
        Ok(Rows::new(header, rows))
    }
}

macro_rules! opaque_debug {
    ($($view:ident),*) => {
        $(
            impl std::fmt::Debug for $view {
                fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                    f.debug_struct(stringify!($view))
                        .field("key", &self.key)
                        .finish_non_exhaustive()
                }
            }
        )*
    };
}

opaque_debug!(DuplicatesView, ConflictsView, MergeView);
