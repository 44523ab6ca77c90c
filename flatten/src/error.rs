//! Error types for flattening runs.
//!
//! Only conditions that make the whole run meaningless are errors. Anything
//! wrong with a single row or question degrades to a sentinel cell instead.

use thiserror::Error;

/// Errors that can abort a flattening run.
#[derive(Debug, Error)]
pub enum FlattenError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV reading or writing failure.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    ConfigError(#[from] form_flatten_config::ConfigError),

    /// No payload column was configured and none could be detected.
    #[error("could not detect the JSON payload column; set 'payload_col' in the configuration")]
    MissingPayloadColumn,

    /// An explicitly configured column is not in the input header.
    #[error("configured column '{0}' is not present in the input header")]
    MissingColumn(String),
}

/// Convenience alias for results with [`FlattenError`].
pub type Result<T> = std::result::Result<T, FlattenError>;
