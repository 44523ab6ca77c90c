//! Row selection shared by both passes.

use chrono::NaiveDate;
use form_flatten_config::FlattenConfig;
use form_flatten_core::normalize_title;
use tracing::warn;

use crate::table::Row;

/// Parses a submission date cell.
///
/// Accepts `YYYY-MM-DD` optionally followed by a time part (only the first
/// ten characters are read, a trailing `Z` is tolerated) or `DD/MM/YYYY`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use form_flatten::filter::parse_submission_date;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 5);
/// assert_eq!(parse_submission_date("2024-03-05T10:11:12Z"), day);
/// assert_eq!(parse_submission_date(" 05/03/2024 "), day);
/// assert_eq!(parse_submission_date("yesterday"), None);
/// ```
pub fn parse_submission_date(cell: &str) -> Option<NaiveDate> {
    let text = cell.trim();
    let text = text.strip_suffix('Z').unwrap_or(text);
    if text.is_empty() {
        return None;
    }

    if let Some(prefix) = text.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(text, "%d/%m/%Y").ok()
}

/// Decides which rows take part in a run.
///
/// A row is kept when no title allow-list is configured, or when a title
/// column is known and the row's normalized title is on the list. With a
/// date range configured and a date column known, the row's submission date
/// must also parse and fall inside the range.
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    titles: Option<(Vec<String>, Option<String>)>,
    dates: Option<DateWindow>,
}

#[derive(Debug, Clone)]
struct DateWindow {
    column: String,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateWindow {
    fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

impl RowFilter {
    /// Filter that keeps every row.
    pub fn keep_all() -> Self {
        Self::default()
    }

    /// Builds the filter from the configuration and the resolved columns.
    pub fn new(config: &FlattenConfig, title_col: Option<&str>, date_col: Option<&str>) -> Self {
        let titles = config
            .title_filter()
            .map(|allowed| (allowed.to_vec(), title_col.map(str::to_string)));

        let dates = if !config.has_date_range() {
            None
        } else if let Some(column) = date_col {
            Some(DateWindow {
                column: column.to_string(),
                from: config.date_from,
                to: config.date_to,
            })
        } else {
            warn!("date range configured but no date column is known; date filtering skipped");
            None
        };

        Self { titles, dates }
    }

    /// Returns `true` if the row takes part in both passes.
    pub fn keep(&self, row: &Row) -> bool {
        if let Some((allowed, column)) = &self.titles {
            let Some(column) = column else {
                return false;
            };
            let title = normalize_title(row.get_or_empty(column));
            if !allowed.contains(&title) {
                return false;
            }
        }

        if let Some(window) = &self.dates {
            return parse_submission_date(row.get_or_empty(&window.column))
                .is_some_and(|date| window.contains(date));
        }
        true
    }
}
