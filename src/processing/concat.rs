// Concatenation of tables
// Author: Gabriel Demetrios Lafis

use log::debug;

use crate::data::{DataError, Header, Row, Rows, Table, TableRef, Value};

/// Rows of several tables, one after another, under a common header
#[derive(Clone)]
pub struct CatView {
    sources: Vec<TableRef>,
    missing: Value,
}

/// Concatenate tables
///
/// The output header holds every field of every input, in order of first
/// appearance. Each row is laid out under that header by field name; fields
/// its table lacks, or that a short row does not reach, take `missing`.
pub fn cat(sources: Vec<TableRef>, missing: Value) -> CatView {
    CatView { sources, missing }
}

impl Table for CatView {
    fn open(&self) -> Result<Rows<'_>, DataError> {
        let opened = self
            .sources
            .iter()
            .map(|source| source.open())
            .collect::<Result<Vec<_>, _>>()?;

        let mut fields: Vec<String> = Vec::new();
        for rows in &opened {
            for name in rows.header().names() {
                if !fields.iter().any(|f| f == name) {
                    fields.push(name.to_string());
                }
            }
        }
        let header = Header::new(fields);
        debug!("cat: {} tables into {}", opened.len(), header);

        let layouts: Vec<(Rows<'_>, Vec<Option<usize>>)> = opened
            .into_iter()
            .map(|rows| {
                let layout = header.names().map(|name| rows.header().index_of(name)).collect();
                (rows, layout)
            })
            .collect();

        let missing = self.missing.clone();
        // each input is dropped as soon as the next one is reached
        let concatenated = layouts.into_iter().flat_map(move |(rows, layout)| {
            let missing = missing.clone();
            rows.map(move |row| {
                row.map(|row| {
                    Row::new(
                        layout
                            .iter()
                            .map(|&i| i.and_then(|i| row.get(i)).unwrap_or(&missing).clone())
                            .collect(),
                    )
                })
            })
        });

        Ok(Rows::new(header, concatenated))
    }
}

impl std::fmt::Debug for CatView {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("CatView")
            .field("sources", &self.sources.len())
            .field("missing", &self.missing)
            .finish()
    }
}
