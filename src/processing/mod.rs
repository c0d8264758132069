// Processing module for lazy table transformations
// Author: Gabriel Demetrios Lafis

mod aggregate;
mod concat;
mod group;
mod reshape;
mod set;
mod sort;

pub use aggregate::*;
pub use concat::*;
pub use group::*;
pub use reshape::*;
pub use set::*;
pub use sort::*;

use crate::data::{DataError, DataSet, KeySpec, Table, Value};

/// Chained composition of table views
///
/// Each method wraps `self` in a new view without touching any row; rows are
/// only computed when the resulting table is traversed.
pub trait TableExt: Table + Sized + 'static {
    /// Sort ascending by the given key, an empty key sorting by whole row
    fn sort_by(self, key: impl Into<KeySpec>) -> SortView<Self> {
        sort_by(self, key, false)
    }

    /// Sort descending by the given key
    fn sort_by_desc(self, key: impl Into<KeySpec>) -> SortView<Self> {
        sort_by(self, key, true)
    }

    /// Rows of `self` not in `other`
    fn complement<B: Table + 'static>(self, other: B) -> ComplementView {
        complement(self, other, false)
    }

    /// Rows added and subtracted going from `self` to `other`
    fn diff<B: Table + 'static>(self, other: B) -> (ComplementView, ComplementView) {
        diff(self, other, false)
    }

    /// Rows whose key occurs more than once
    fn duplicates(self, key: impl Into<KeySpec>) -> DuplicatesView {
        duplicates(self, key, false)
    }

    /// Rows of key groups holding conflicting values
    fn conflicts(self, key: impl Into<KeySpec>) -> ConflictsView {
        conflicts(self, key, Value::Null, false)
    }

    /// One merged row per key
    fn merge_rows(self, key: impl Into<KeySpec>) -> MergeView {
        merge(self, key, Value::Null, false)
    }

    /// Unpivot fields into variable/value rows
    fn melt(self, options: MeltOptions) -> MeltView<Self> {
        melt(self, options)
    }

    /// Pivot variable/value rows back into fields
    fn recast(self, options: RecastOptions) -> RecastView<Self> {
        recast(self, options)
    }

    /// Drain one traversal into memory
    fn collect_rows(&self) -> Result<DataSet, DataError> {
        DataSet::from_table(self)
    }
}

impl<T: Table + 'static> TableExt for T {}
