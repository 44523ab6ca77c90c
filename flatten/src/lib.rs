//! Flattening of form-submission exports.
//!
//! An export table carries one serialized form submission per row. This
//! crate turns it into a table with the original meta columns followed by
//! one column per distinct question seen anywhere in the input.
//!
//! # Main entry points
//!
//! - [`flatten_csv`]: full conversion of the configured CSV files.
//! - [`discover_csv_columns`]: column detection and discovery only, without
//!   writing output.
//! - [`pipeline::Flattener`]: the same conversion over any
//!   [`table::RowSource`] / [`table::RowSink`] pair.
//!
//! # Example
//!
//! ```
//! use form_flatten::{flatten_csv, FlattenConfig};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let input = dir.path().join("export.csv");
//! let output = dir.path().join("flat.csv");
//! std::fs::write(
//!     &input,
//!     "Client Name,Json\nJane,\"[{\"\"questions\"\": [{\"\"type\"\": \"\"Yes/No\"\", \"\"title\"\": \"\"Smoker\"\", \"\"answerText\"\": \"\"No\"\"}]}]\"\n",
//! )
//! .unwrap();
//!
//! let config = FlattenConfig {
//!     input_csv: Some(input),
//!     output_csv: Some(output.clone()),
//!     ..FlattenConfig::default()
//! };
//! let report = flatten_csv(&config).unwrap();
//! assert_eq!(report.question_columns, ["Smoker"]);
//! assert_eq!(std::fs::read_to_string(&output).unwrap(), "Client Name,Smoker\r\nJane,No\r\n");
//! ```

pub mod answers;
pub mod csv_io;
pub mod error;
pub mod extract;
pub mod filter;
pub mod output;
pub mod payload;
pub mod pipeline;
pub mod plan;
pub mod report;
pub mod sniff;
pub mod table;
pub mod titles;

use tracing::info;

pub use csv_io::{CsvSink, CsvSource};
pub use error::{FlattenError, Result};
pub use form_flatten_config::FlattenConfig;
pub use output::{ReportFormat, format_report};
pub use pipeline::Flattener;
pub use report::FlattenReport;

/// Converts `config.input_path()` into `config.output_path()`.
///
/// The output file is only created once the payload column has been
/// resolved, so a configuration error leaves no file behind.
///
/// # Errors
///
/// Fails on I/O or CSV errors and when no payload column can be resolved.
/// Problems inside individual rows never fail the run.
pub fn flatten_csv(config: &FlattenConfig) -> Result<FlattenReport> {
    let source = CsvSource::new(config.input_path());
    let flattener = Flattener::new(config.clone());
    let plan = flattener.plan(&source)?;
    info!(input = %source.path().display(), "Flattening");

    let mut sink = CsvSink::create(config.output_path())?;
    let report = flattener.run_with_plan(&source, &plan, &mut sink)?;
    info!(output = %config.output_path().display(), "Wrote flattened table");
    Ok(report)
}

/// Detects columns and runs discovery over `config.input_path()`.
pub fn discover_csv_columns(config: &FlattenConfig) -> Result<FlattenReport> {
    let source = CsvSource::new(config.input_path());
    Flattener::new(config.clone()).discover(&source)
}
