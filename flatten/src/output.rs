//! Output formatting for run reports.

use crate::report::FlattenReport;

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ReportFormat {
    Json,
    Yaml,
    Text,
}

/// Formats a run report in the requested format.
pub fn format_report(report: &FlattenReport, format: ReportFormat) -> Result<String, String> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| format!("JSON serialization failed: {e}")),
        ReportFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        ReportFormat::Text => Ok(report_to_text(report)),
    }
}

fn report_to_text(report: &FlattenReport) -> String {
    let mut out = String::new();

    out.push_str(&report.detected_columns_line());
    out.push('\n');

    if report.meta_cols.is_empty() {
        out.push_str("Meta columns: none\n");
    } else {
        out.push_str(&format!("Meta columns: {}\n", report.meta_cols.join(", ")));
    }

    out.push_str(&format!(
        "Rows: {} read, {} kept, {} without payload",
        report.rows_read, report.rows_kept, report.rows_without_payload
    ));
    if let Some(written) = report.rows_written {
        out.push_str(&format!(", {written} written"));
    }
    out.push('\n');

    out.push_str(&format!(
        "Question columns ({}):\n",
        report.question_columns.len()
    ));
    for (idx, title) in report.question_columns.iter().enumerate() {
        out.push_str(&format!("  {:>3}. {title}\n", idx + 1));
    }

    out
}
