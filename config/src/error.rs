//! Error types for configuration loading.

use thiserror::Error;

/// Errors that can occur while loading a flattening configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Config file extension is neither JSON nor YAML.
    #[error("unsupported config format '{0}': expected .json, .yml or .yaml")]
    UnsupportedFormat(String),

    /// Config parsed but violates a structural rule.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
