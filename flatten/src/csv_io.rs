//! CSV connectors for [`RowSource`] and [`RowSink`].

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::{ByteRecord, ReaderBuilder, Terminator, WriterBuilder};
use tracing::warn;

use crate::error::Result;
use crate::table::{Row, RowSink, RowSource, RowStream};

const UTF8_BOM: char = '\u{feff}';

/// A CSV file with a header row, re-opened for every pass.
///
/// Records may be shorter or longer than the header, cells have no size
/// cap, a leading byte-order mark is dropped, and invalid UTF-8 is decoded
/// lossily.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn decode_record(record: &ByteRecord, line: u64) -> Vec<String> {
    record
        .iter()
        .map(|field| match std::str::from_utf8(field) {
            Ok(text) => text.to_string(),
            Err(_) => {
                warn!(line, "invalid UTF-8 in CSV field, decoding lossily");
                String::from_utf8_lossy(field).into_owned()
            }
        })
        .collect()
}

impl RowSource for CsvSource {
    fn open(&self) -> Result<RowStream<'_>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let mut header_fields = decode_record(reader.byte_headers()?, 1);
        if let Some(first) = header_fields.first_mut() {
            if let Some(stripped) = first.strip_prefix(UTF8_BOM) {
                *first = stripped.to_string();
            }
        }
        let headers: Arc<[String]> = header_fields.into();

        let shared = Arc::clone(&headers);
        let rows = reader.into_byte_records().map(move |record| {
            let record = record?;
            let line = record.position().map_or(0, |pos| pos.line());
            Ok(Row::new(Arc::clone(&shared), decode_record(&record, line)))
        });
        Ok(RowStream::new(headers, rows))
    }
}

/// CSV output writer. Records end in `\r\n`.
///
/// # Examples
///
/// ```
/// use form_flatten::csv_io::CsvSink;
/// use form_flatten::table::RowSink;
///
/// let mut sink = CsvSink::from_writer(Vec::new());
/// sink.write_header(&["A".into(), "B".into()]).unwrap();
/// sink.write_row(&["1".into(), "x, y".into()]).unwrap();
/// let bytes = sink.into_inner().unwrap();
/// assert_eq!(String::from_utf8(bytes).unwrap(), "A,B\r\n1,\"x, y\"\r\n");
/// ```
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    /// Creates (or truncates) the output file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let writer = Self::builder().from_path(path)?;
        Ok(Self { writer })
    }
}

impl<W: Write> CsvSink<W> {
    fn builder() -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder.flexible(false).terminator(Terminator::CRLF);
        builder
    }

    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: Self::builder().from_writer(writer),
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| err.into_error().into())
    }
}

impl<W: Write> RowSink for CsvSink<W> {
    fn write_header(&mut self, header: &[String]) -> Result<()> {
        self.writer.write_record(header)?;
        Ok(())
    }

    fn write_row(&mut self, cells: &[String]) -> Result<()> {
        self.writer.write_record(cells)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
