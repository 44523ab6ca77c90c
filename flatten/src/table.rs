//! Row sources and sinks.
//!
//! The pipeline reads its input twice, so a [`RowSource`] hands out a fresh
//! [`RowStream`] per [`open`](RowSource::open) call instead of being an
//! iterator itself. [`MemoryTable`] implements both sides and backs the
//! tests; the CSV connectors live in [`crate::csv_io`].

use std::sync::Arc;

use crate::error::Result;

/// One input record: field values addressed by header name.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    headers: Arc<[String]>,
    fields: Vec<String>,
}

impl Row {
    pub fn new(headers: Arc<[String]>, fields: Vec<String>) -> Self {
        Self { headers, fields }
    }

    /// Value of `column`, or `None` when the header has no such column or
    /// the record is too short to reach it. A repeated header name resolves
    /// to its last occurrence.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.headers
            .iter()
            .rposition(|h| h == column)
            .and_then(|idx| self.fields.get(idx))
            .map(String::as_str)
    }

    /// Value of `column`, reading missing cells as the empty string.
    pub fn get_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or_default()
    }
}

/// One pass over a source: the header plus its records in source order.
pub struct RowStream<'a> {
    headers: Arc<[String]>,
    rows: Box<dyn Iterator<Item = Result<Row>> + 'a>,
}

impl<'a> RowStream<'a> {
    pub fn new(
        headers: Arc<[String]>,
        rows: impl Iterator<Item = Result<Row>> + 'a,
    ) -> Self {
        Self {
            headers,
            rows: Box::new(rows),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl Iterator for RowStream<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }
}

/// A re-readable table.
pub trait RowSource {
    /// Starts a new pass from the first record.
    fn open(&self) -> Result<RowStream<'_>>;
}

/// Destination table for flattened rows.
pub trait RowSink {
    fn write_header(&mut self, header: &[String]) -> Result<()>;

    fn write_row(&mut self, cells: &[String]) -> Result<()>;

    /// Flushes buffered output.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// In-memory table usable as both source and sink.
///
/// # Examples
///
/// ```
/// use form_flatten::table::{MemoryTable, RowSource};
///
/// let table = MemoryTable::new(["Title", "Json"]).with_row(["Intake", "[]"]);
/// let rows: Vec<_> = table.open().unwrap().collect::<Result<_, _>>().unwrap();
/// assert_eq!(rows[0].get("Title"), Some("Intake"));
/// assert_eq!(rows[0].get("Missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MemoryTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a record.
    pub fn with_row<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Every value of `column`, top to bottom.
    pub fn column(&self, column: &str) -> Vec<&str> {
        let Some(idx) = self.headers.iter().rposition(|h| h == column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .map(|row| row.get(idx).map(String::as_str).unwrap_or_default())
            .collect()
    }
}

impl RowSource for MemoryTable {
    fn open(&self) -> Result<RowStream<'_>> {
        let headers: Arc<[String]> = self.headers.clone().into();
        let shared = Arc::clone(&headers);
        let rows = self
            .rows
            .iter()
            .map(move |fields| Ok(Row::new(Arc::clone(&shared), fields.clone())));
        Ok(RowStream::new(headers, rows))
    }
}

impl RowSink for MemoryTable {
    fn write_header(&mut self, header: &[String]) -> Result<()> {
        self.headers = header.to_vec();
        self.rows.clear();
        Ok(())
    }

    fn write_row(&mut self, cells: &[String]) -> Result<()> {
        self.rows.push(cells.to_vec());
        Ok(())
    }
}
