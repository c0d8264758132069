// Data module for values, rows, headers and table streams
// Author: Gabriel Demetrios Lafis

mod key;
mod schema;
mod table;
mod value;

pub use key::*;
pub use schema::*;
pub use table::*;

use thiserror::Error;

/// Represents a row in a table
///
/// Rows are not required to match the header length. Short and long rows
/// are passed through untouched unless an operation documents otherwise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    /// Create a new row with the given values
    pub fn new(values: Vec<Value>) -> Self {
        Row { values }
    }

    /// Get a reference to a value by index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get a mutable reference to a value by index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.values.get_mut(index)
    }

    /// Get a value by index, failing if the row is too short to hold it
    pub fn value_at(&self, index: usize) -> Result<&Value, DataError> {
        self.values.get(index).ok_or(DataError::RowTooShort {
            index,
            len: self.values.len(),
        })
    }

    /// Number of values in the row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row holds no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::new(values)
    }
}

/// Represents a value in a row
///
/// Values carry a total order so that rows can be sorted and compared
/// across tables. Different variants order by variant rank, see
/// [`Value::rank`].
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Binary(Vec<u8>),
    Array(Vec<Value>),
}

/// Represents an error raised while resolving or traversing a table
#[derive(Debug, Error)]
pub enum DataError {
    /// The stream never produced a header
    #[error("stream produced no header")]
    EmptyStream,

    /// A named field is absent from the header
    #[error("field '{0}' not found in header")]
    FieldNotFound(String),

    /// A positional selector lies outside the header
    #[error("field index {index} out of range for header of {len} fields")]
    FieldIndex { index: usize, len: usize },

    /// A key or positional lookup exceeds the length of an actual row
    #[error("row of length {len} is too short for field index {index}")]
    RowTooShort { index: usize, len: usize },

    /// Field roles are missing or overlap
    #[error("schema error: {0}")]
    Schema(String),
}
