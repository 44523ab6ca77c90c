//! Column detection for the title, date and payload columns.
//!
//! Detection is an injectable strategy: anything implementing
//! [`ColumnSniffer`] (including a plain closure) can stand in for the
//! [`HeuristicSniffer`], so callers and tests can pin the result.

use serde_json::Value;

use crate::payload::parse_nonempty_sections;
use crate::table::Row;

/// Data rows read from the top of the input for detection.
pub const SAMPLE_ROWS: usize = 50;
/// Sample rows probed per candidate payload column.
pub const PAYLOAD_PROBE_ROWS: usize = 25;

/// Header names tried, in order, for the form-title column.
pub const LIKELY_TITLE_COLS: [&str; 6] =
    ["Title", "title", "FormTitle", "formTitle", "Form Name", "Name"];

/// Header names tried, in order, for the submission-date column.
pub const LIKELY_DATE_COLS: [&str; 13] = [
    // Misspelled exactly as the export writes it.
    "Submittted At",
    "SubmittedAt",
    "Submitted At",
    "submittedAt",
    "submitted_at",
    "CreatedAt",
    "Created At",
    "createdAt",
    "created_at",
    "Date",
    "date",
    "Timestamp",
    "timestamp",
];

/// Header names tried, in order, for the payload column.
pub const LIKELY_PAYLOAD_COLS: [&str; 12] = [
    "Json", "json", "Payload", "payload", "Response", "response", "FormJson", "Form JSON",
    "Data", "data", "Answers", "answers",
];

/// The column a sniffer is asked to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Title,
    Date,
    Payload,
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Title => "title",
            Self::Date => "date",
            Self::Payload => "payload",
        })
    }
}

/// Picks the column for a role from the header and a sample of rows.
pub trait ColumnSniffer {
    /// Returns the chosen column name, or `None` when unknown.
    fn sniff(&self, role: ColumnRole, headers: &[String], sample: &[Row]) -> Option<String>;
}

impl<F> ColumnSniffer for F
where
    F: Fn(ColumnRole, &[String], &[Row]) -> Option<String>,
{
    fn sniff(&self, role: ColumnRole, headers: &[String], sample: &[Row]) -> Option<String> {
        self(role, headers, sample)
    }
}

/// Name-list and payload-probing heuristics for export tables.
///
/// # Examples
///
/// ```
/// use form_flatten::sniff::{ColumnRole, ColumnSniffer, HeuristicSniffer};
/// use form_flatten::table::{MemoryTable, RowSource};
///
/// let table = MemoryTable::new(["Title", "Blob"])
///     .with_row(["Intake", r#"[{"questions": []}]"#]);
/// let stream = table.open().unwrap();
/// let headers = stream.headers().to_vec();
/// let sample: Vec<_> = stream.collect::<Result<_, _>>().unwrap();
///
/// let sniffer = HeuristicSniffer;
/// assert_eq!(sniffer.sniff(ColumnRole::Title, &headers, &sample).as_deref(), Some("Title"));
/// assert_eq!(sniffer.sniff(ColumnRole::Payload, &headers, &sample).as_deref(), Some("Blob"));
/// assert_eq!(sniffer.sniff(ColumnRole::Date, &headers, &sample), None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicSniffer;

impl ColumnSniffer for HeuristicSniffer {
    fn sniff(&self, role: ColumnRole, headers: &[String], sample: &[Row]) -> Option<String> {
        match role {
            ColumnRole::Title => first_present(headers, &LIKELY_TITLE_COLS),
            ColumnRole::Date => first_present(headers, &LIKELY_DATE_COLS),
            ColumnRole::Payload => detect_payload_column(headers, sample),
        }
    }
}

fn first_present(headers: &[String], candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find(|name| headers.iter().any(|h| h == *name))
        .map(|name| name.to_string())
}

/// Finds the payload column by probing sample cells.
///
/// Likely names are tried first, accepting any non-empty section list.
/// Failing that, every header is probed for a list whose first element is
/// a record with `questions` or `title`.
pub fn detect_payload_column(headers: &[String], sample: &[Row]) -> Option<String> {
    let probe = &sample[..sample.len().min(PAYLOAD_PROBE_ROWS)];

    let by_name = LIKELY_PAYLOAD_COLS
        .iter()
        .filter(|name| headers.iter().any(|h| h == *name))
        .find(|name| {
            probe
                .iter()
                .any(|row| parse_nonempty_sections(row.get(name)).is_some())
        });
    if let Some(name) = by_name {
        return Some(name.to_string());
    }

    headers
        .iter()
        .find(|name| {
            probe.iter().any(|row| {
                parse_nonempty_sections(row.get(name))
                    .is_some_and(|sections| looks_like_section(&sections[0]))
            })
        })
        .cloned()
}

fn looks_like_section(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|record| record.contains_key("questions") || record.contains_key("title"))
}
