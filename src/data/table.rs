// Table stream protocol and in-memory tables
// Author: Gabriel Demetrios Lafis

use std::fmt;
use std::rc::Rc;

use super::{DataError, Header, Row, Value};

/// Boxed iterator over the data rows of one traversal
pub type RowIter<'a> = Box<dyn Iterator<Item = Result<Row, DataError>> + 'a>;

/// Shared, immutable table definition
pub type TableRef = Rc<dyn Table>;

/// A re-iterable, lazily evaluated table
///
/// Every call to [`Table::open`] starts an independent traversal. A traversal
/// owns whatever it acquired to serve its rows, including the traversals of
/// upstream tables, and releases all of it exactly once when it is dropped:
/// after being drained, when abandoned early, or after an error.
pub trait Table {
    /// Start a fresh traversal, reading the header
    ///
    /// Fails with [`DataError::EmptyStream`] if the source never produces a
    /// header.
    fn open(&self) -> Result<Rows<'_>, DataError>;

    /// Read the header of the table
    fn header(&self) -> Result<Header, DataError> {
        Ok(self.open()?.header().clone())
    }
}

impl<T: Table + ?Sized> Table for Rc<T> {
    fn open(&self) -> Result<Rows<'_>, DataError> {
        (**self).open()
    }
}

impl<T: Table + ?Sized> Table for Box<T> {
    fn open(&self) -> Result<Rows<'_>, DataError> {
        (**self).open()
    }
}

impl<T: Table + ?Sized> Table for &T {
    fn open(&self) -> Result<Rows<'_>, DataError> {
        (**self).open()
    }
}

/// One traversal of a table: its header followed by lazily pulled rows
///
/// The row iterator stops after yielding the first error and releases its
/// upstream as soon as it is exhausted or has failed.
pub struct Rows<'a> {
    header: Header,
    rows: StopOnError<RowIter<'a>>,
}

impl<'a> Rows<'a> {
    /// Create a traversal from a header and a row iterator
    pub fn new<I>(header: Header, rows: I) -> Self
    where
        I: Iterator<Item = Result<Row, DataError>> + 'a,
    {
        Rows {
            header,
            rows: StopOnError::new(Box::new(rows)),
        }
    }

    /// The header of the traversal
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Split the traversal into its header and row iterator
    pub fn into_parts(self) -> (Header, RowIter<'a>) {
        (self.header, Box::new(self.rows))
    }
}

impl Iterator for Rows<'_> {
    type Item = Result<Row, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }
}

impl fmt::Debug for Rows<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Rows")
            .field("header", &self.header)
            .field("open", &self.rows.inner.is_some())
            .finish()
    }
}

/// Drops the inner iterator at the first error or at the end of input
struct StopOnError<I> {
    inner: Option<I>,
}

impl<I> StopOnError<I> {
    fn new(inner: I) -> Self {
        StopOnError { inner: Some(inner) }
    }
}

impl<I> Iterator for StopOnError<I>
where
    I: Iterator<Item = Result<Row, DataError>>,
{
    type Item = Result<Row, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.as_mut()?.next();
        if !matches!(item, Some(Ok(_))) {
            self.inner = None;
        }
        item
    }
}

/// Represents a materialized table held in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    pub header: Header,
    pub data: Vec<Row>,
}

impl DataSet {
    /// Create a new empty dataset
    pub fn new(header: impl Into<Header>) -> Self {
        DataSet {
            header: header.into(),
            data: Vec::new(),
        }
    }

    /// Create a dataset from a header and rows
    pub fn from_rows(header: impl Into<Header>, data: Vec<Row>) -> Self {
        DataSet {
            header: header.into(),
            data,
        }
    }

    /// Drain one traversal of a table into memory
    pub fn from_table<T: Table + ?Sized>(table: &T) -> Result<Self, DataError> {
        let rows = table.open()?;
        let header = rows.header().clone();
        let data = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(DataSet { header, data })
    }

    /// Add a row to the dataset
    ///
    /// Rows of any length are accepted.
    pub fn add_row(&mut self, row: Row) {
        self.data.push(row);
    }

    /// Get the number of rows in the dataset
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a reference to a row by index
    pub fn get_row(&self, index: usize) -> Option<&Row> {
        self.data.get(index)
    }

    /// Get a mutable reference to a row by index
    pub fn get_row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.data.get_mut(index)
    }
}

impl Table for DataSet {
    fn open(&self) -> Result<Rows<'_>, DataError> {
        Ok(Rows::new(
            self.header.clone(),
            self.data.iter().cloned().map(Ok),
        ))
    }
}

/// A table backed by a closure producing raw rows, the first being the header
///
/// This is how external sources such as decoders and generators satisfy the
/// [`Table`] capability. The closure is called once per traversal.
pub struct FnTable<F> {
    producer: F,
}

impl<F, I> FnTable<F>
where
    F: Fn() -> I,
    I: IntoIterator<Item = Result<Vec<Value>, DataError>>,
{
    /// Create a table from a producer of raw rows
    pub fn new(producer: F) -> Self {
        FnTable { producer }
    }
}

impl<F, I> Table for FnTable<F>
where
    F: Fn() -> I,
    I: IntoIterator<Item = Result<Vec<Value>, DataError>>,
    I::IntoIter: 'static,
{
    fn open(&self) -> Result<Rows<'_>, DataError> {
        let mut raw = (self.producer)().into_iter();
        let header = match raw.next() {
            Some(first) => Header::from_values(&first?),
            None => return Err(DataError::EmptyStream),
        };
        Ok(Rows::new(header, raw.map(|r| r.map(Row::new))))
    }
}

impl<F> fmt::Debug for FnTable<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FnTable").finish_non_exhaustive()
    }
}
