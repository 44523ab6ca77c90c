//! Column resolution: which input columns play which role.

use form_flatten_config::FlattenConfig;
use tracing::{debug, warn};

use crate::error::{FlattenError, Result};
use crate::sniff::{ColumnRole, ColumnSniffer};
use crate::table::Row;

/// Meta columns copied to the output when none are configured.
pub const DEFAULT_META_COLS: [&str; 3] = ["ClientName", "Client Name", "Patient Name"];

/// Resolved input columns for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    pub title_col: Option<String>,
    pub date_col: Option<String>,
    pub payload_col: String,
    /// Input columns copied verbatim to the front of every output row.
    pub meta_cols: Vec<String>,
}

impl ColumnPlan {
    /// Resolves every column role.
    ///
    /// Configured overrides win over the sniffer. A configured payload
    /// column must exist in the header; configured title and date columns
    /// that do not exist are kept (their cells read as empty) with a warning.
    ///
    /// # Errors
    ///
    /// [`MissingColumn`](FlattenError::MissingColumn) for an absent
    /// configured payload column, [`MissingPayloadColumn`](FlattenError::MissingPayloadColumn)
    /// when none is configured and the sniffer finds none.
    pub fn resolve(
        config: &FlattenConfig,
        headers: &[String],
        sample: &[Row],
        sniffer: &dyn ColumnSniffer,
    ) -> Result<Self> {
        let has = |name: &str| headers.iter().any(|h| h == name);

        let payload_col = match config.payload_col.as_deref() {
            Some(name) if has(name) => name.to_string(),
            Some(name) => return Err(FlattenError::MissingColumn(name.to_string())),
            None => sniffer
                .sniff(ColumnRole::Payload, headers, sample)
                .ok_or(FlattenError::MissingPayloadColumn)?,
        };

        let optional_role = |configured: Option<&String>, role: ColumnRole| match configured {
            Some(name) => {
                if !has(name) {
                    warn!(column = %name, %role, "configured column is not in the input header");
                }
                Some(name.clone())
            }
            None => sniffer.sniff(role, headers, sample),
        };
        let title_col = optional_role(config.title_col.as_ref(), ColumnRole::Title);
        let date_col = optional_role(config.date_col.as_ref(), ColumnRole::Date);

        let meta_cols = match config.meta_cols.as_deref() {
            Some(configured) => {
                let mut cols: Vec<String> = Vec::new();
                for name in configured {
                    if !has(name) {
                        warn!(column = %name, "configured meta column is not in the input header");
                    } else if !cols.contains(name) {
                        cols.push(name.clone());
                    }
                }
                cols
            }
            None => {
                let mut cols: Vec<String> = DEFAULT_META_COLS
                    .iter()
                    .filter(|name| has(name))
                    .map(|name| name.to_string())
                    .collect();
                for name in [&title_col, &date_col].into_iter().flatten() {
                    if has(name) && !cols.contains(name) {
                        cols.push(name.clone());
                    }
                }
                cols
            }
        };

        debug!(?title_col, ?date_col, %payload_col, ?meta_cols, "Resolved columns");
        Ok(Self {
            title_col,
            date_col,
            payload_col,
            meta_cols,
        })
    }

    /// Output header: meta columns, then `questions` in discovery order.
    pub fn output_header(&self, questions: &[String]) -> Vec<String> {
        self.meta_cols.iter().chain(questions).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniff::HeuristicSniffer;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn config(raw: &str) -> FlattenConfig {
        FlattenConfig::from_json_str(raw).unwrap()
    }

    fn fixed_payload(role: ColumnRole, _: &[String], _: &[Row]) -> Option<String> {
        (role == ColumnRole::Payload).then(|| "Json".to_string())
    }

    fn heuristic_with_json(role: ColumnRole, headers: &[String], sample: &[Row]) -> Option<String> {
        match role {
            ColumnRole::Payload => fixed_payload(role, headers, sample),
            other => HeuristicSniffer.sniff(other, headers, sample),
        }
    }

    #[test]
    fn test_default_meta_columns() {
        let header = headers(&["Json", "Submittted At", "Client Name", "Title", "ClientName"]);
        let plan = ColumnPlan::resolve(&config("{}"), &header, &[], &heuristic_with_json).unwrap();
        assert_eq!(plan.title_col.as_deref(), Some("Title"));
        assert_eq!(plan.date_col.as_deref(), Some("Submittted At"));
        assert_eq!(
            plan.meta_cols,
            vec!["ClientName", "Client Name", "Title", "Submittted At"]
        );
    }

    #[test]
    fn test_configured_meta_columns_are_filtered_and_deduplicated() {
        let header = headers(&["Json", "A", "B"]);
        let cfg = config(r#"{"meta_cols": ["B", "missing", "A", "B"], "title_col": "A"}"#);
        let plan = ColumnPlan::resolve(&cfg, &header, &[], &fixed_payload).unwrap();
        assert_eq!(plan.meta_cols, vec!["B", "A"]);
    }

    #[test]
    fn test_overrides_win_over_sniffer() {
        let header = headers(&["Json", "Body", "Title", "Form"]);
        let cfg = config(r#"{"payload_col": "Body", "title_col": "Form"}"#);
        let plan = ColumnPlan::resolve(&cfg, &header, &[], &HeuristicSniffer).unwrap();
        assert_eq!(plan.payload_col, "Body");
        assert_eq!(plan.title_col.as_deref(), Some("Form"));
    }

    #[test]
    fn test_missing_title_override_is_kept() {
        let header = headers(&["Json"]);
        let plan =
            ColumnPlan::resolve(&config(r#"{"date_col": "When"}"#), &header, &[], &fixed_payload)
                .unwrap();
        assert_eq!(plan.date_col.as_deref(), Some("When"));
        assert!(plan.meta_cols.is_empty());
    }

    #[test]
    fn test_missing_payload_column_errors() {
        let header = headers(&["Title"]);
        let err = ColumnPlan::resolve(&config("{}"), &header, &[], &HeuristicSniffer).unwrap_err();
        assert!(matches!(err, FlattenError::MissingPayloadColumn));
        assert!(err.to_string().contains("payload_col"));

        let cfg = config(r#"{"payload_col": "Nope"}"#);
        let err = ColumnPlan::resolve(&cfg, &header, &[], &HeuristicSniffer).unwrap_err();
        assert!(matches!(err, FlattenError::MissingColumn(ref name) if name == "Nope"));
    }

    #[test]
    fn test_output_header_puts_meta_first() {
        let header = headers(&["Json", "Patient Name"]);
        let plan = ColumnPlan::resolve(&config("{}"), &header, &[], &fixed_payload).unwrap();
        assert_eq!(
            plan.output_header(&["Q1".to_string()]),
            vec!["Patient Name", "Q1"]
        );
    }
}
