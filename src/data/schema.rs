// Header definition for table streams
// Author: Gabriel Demetrios Lafis

use std::fmt;

use super::Value;

/// Represents the header of a table: an ordered sequence of field names
///
/// Names are matched by first occurrence, so a header referenced by name
/// should carry unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Header {
    pub fields: Vec<String>,
}

impl Header {
    /// Create a new header with the given field names
    pub fn new(fields: Vec<String>) -> Self {
        Header { fields }
    }

    /// Build a header from a raw header row, using each value's display form
    pub fn from_values(values: &[Value]) -> Self {
        Header {
            fields: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Number of fields in the header
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the header has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of the first field with the given name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// Check if a field with the given name exists
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Get a field name by index
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Iterate over the field names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]", self.fields.join(", "))
    }
}

impl From<Vec<String>> for Header {
    fn from(fields: Vec<String>) -> Self {
        Header::new(fields)
    }
}

impl From<Vec<&str>> for Header {
    fn from(fields: Vec<&str>) -> Self {
        Header::new(fields.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Header {
    fn from(fields: [&str; N]) -> Self {
        Header::new(fields.iter().map(|f| f.to_string()).collect())
    }
}
