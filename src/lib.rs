// Rust Table Stream Engine
// Author: Gabriel Demetrios Lafis

//! # Rust Table Stream Engine
//!
//! A lazy, streaming table transformation engine written in Rust.
//!
//! A table is a header followed by a lazy sequence of rows. Every transform
//! returns a new table view; no row is computed until the view is traversed,
//! and only as far as the consumer pulls. Views are re-iterable: every call
//! to [`Table::open`] starts an independent traversal.
//!
//! ## Features
//!
//! - Key resolution by field name or position
//! - Stable sorting by key
//! - Sort-merge complement and diff between tables
//! - Duplicate, conflict and merge resolution over key groups
//! - Melt and recast reshaping with reducers
//! - Concatenation of tables with differing headers
//!
//! ## Example
//!
//! ```rust
//! use rust_table_stream_engine::{
//!     data::{DataSet, Row, Table, Value},
//!     processing::{RecastOptions, TableExt},
//!     row,
//! };
//!
//! let molten = DataSet::from_rows(
//!     ["id", "variable", "value"],
//!     vec![
//!         row![3, "age", 16],
//!         row![1, "gender", "F"],
//!         row![2, "gender", "M"],
//!         row![2, "age", 17],
//!         row![1, "age", 12],
//!         row![3, "gender", "M"],
//!     ],
//! );
//!
//! let wide = molten.recast(RecastOptions::new().with_key("id"));
//! let result = wide.collect_rows().unwrap();
//!
//! assert_eq!(result.header.fields, vec!["id", "age", "gender"]);
//! assert_eq!(result.data[0], row![1, 12, "F"]);
//! ```

pub mod data;
pub mod processing;
pub mod utils;

// Re-export main types
pub use data::{DataError, DataSet, FieldSelector, Header, KeySpec, Row, Table, TableRef, Value};
pub use processing::TableExt;
pub use utils::Config;

/// Build a [`Row`](data::Row) from values convertible into [`Value`](data::Value)
#[macro_export]
macro_rules! row {
    () => {
        $crate::data::Row::new(Vec::new())
    };
    ($($value:expr),+ $(,)?) => {
        $crate::data::Row::new(vec![$($crate::data::Value::from($value)),+])
    };
}
