// Key specifications and their resolution against a header
// Author: Gabriel Demetrios Lafis

use super::{DataError, Header, Row, Value};

/// Identifies a single field, either by name or by zero-based position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldSelector {
    Name(String),
    Position(usize),
}

impl FieldSelector {
    /// Resolve the selector to a position in the header
    pub fn resolve(&self, header: &Header) -> Result<usize, DataError> {
        match self {
            FieldSelector::Name(name) => header
                .index_of(name)
                .ok_or_else(|| DataError::FieldNotFound(name.clone())),
            FieldSelector::Position(index) if *index < header.len() => Ok(*index),
            FieldSelector::Position(index) => Err(DataError::FieldIndex {
                index: *index,
                len: header.len(),
            }),
        }
    }
}

impl From<&str> for FieldSelector {
    fn from(name: &str) -> Self {
        FieldSelector::Name(name.to_string())
    }
}

impl From<String> for FieldSelector {
    fn from(name: String) -> Self {
        FieldSelector::Name(name)
    }
}

impl From<&String> for FieldSelector {
    fn from(name: &String) -> Self {
        FieldSelector::Name(name.clone())
    }
}

impl From<usize> for FieldSelector {
    fn from(index: usize) -> Self {
        FieldSelector::Position(index)
    }
}

/// An ordered sequence of field selectors
///
/// Names and positions may be freely mixed. A scalar selector converts to a
/// one-element key. An empty key defers to the default of the operation
/// consuming it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeySpec {
    selectors: Vec<FieldSelector>,
}

impl KeySpec {
    /// Create a key from the given selectors
    pub fn new(selectors: Vec<FieldSelector>) -> Self {
        KeySpec { selectors }
    }

    /// The empty key
    pub fn empty() -> Self {
        KeySpec::default()
    }

    /// Check if the key has no selectors
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Number of selectors in the key
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// The selectors of the key, in order
    pub fn selectors(&self) -> &[FieldSelector] {
        &self.selectors
    }
}

impl From<FieldSelector> for KeySpec {
    fn from(selector: FieldSelector) -> Self {
        KeySpec::new(vec![selector])
    }
}

impl From<&str> for KeySpec {
    fn from(name: &str) -> Self {
        KeySpec::from(FieldSelector::from(name))
    }
}

impl From<String> for KeySpec {
    fn from(name: String) -> Self {
        KeySpec::from(FieldSelector::from(name))
    }
}

impl From<usize> for KeySpec {
    fn from(index: usize) -> Self {
        KeySpec::from(FieldSelector::from(index))
    }
}

impl<S: Into<FieldSelector>> From<Vec<S>> for KeySpec {
    fn from(selectors: Vec<S>) -> Self {
        KeySpec::new(selectors.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<FieldSelector>, const N: usize> From<[S; N]> for KeySpec {
    fn from(selectors: [S; N]) -> Self {
        KeySpec::new(selectors.into_iter().map(Into::into).collect())
    }
}

/// Resolve a key specification against a header into field positions
///
/// Named selectors match the first field with that name. Fails with
/// [`DataError::FieldNotFound`] for an absent name and
/// [`DataError::FieldIndex`] for a position outside the header.
pub fn resolve_key(header: &Header, key: &KeySpec) -> Result<Vec<usize>, DataError> {
    key.selectors()
        .iter()
        .map(|selector| selector.resolve(header))
        .collect()
}

/// Extracts the key projection of rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyProjection {
    /// The whole row is the key
    WholeRow,
    /// The values at the given positions form the key
    Positions(Vec<usize>),
}

impl KeyProjection {
    /// Resolve a key against a header, an empty key selecting the whole row
    pub fn resolve(header: &Header, key: &KeySpec) -> Result<Self, DataError> {
        if key.is_empty() {
            return Ok(KeyProjection::WholeRow);
        }
        resolve_key(header, key).map(KeyProjection::Positions)
    }

    /// Project a row onto the key
    ///
    /// Fails with [`DataError::RowTooShort`] when the row does not reach a
    /// key position.
    pub fn project(&self, row: &Row) -> Result<Vec<Value>, DataError> {
        match self {
            KeyProjection::WholeRow => Ok(row.values.clone()),
            KeyProjection::Positions(positions) => positions
                .iter()
                .map(|&i| row.value_at(i).cloned())
                .collect(),
        }
    }
}
