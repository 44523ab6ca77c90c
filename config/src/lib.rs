//! Configuration for form-submission flattening runs.
//!
//! A run is driven by a small JSON (or YAML) record naming the input and
//! output tables, optional column overrides for the title/date/payload
//! columns, the output meta columns, an optional form-title allow-list, and
//! extra answer keys for question types without a dedicated rule.
//!
//! # Quick start
//!
//! ```no_run
//! use form_flatten_config::FlattenConfig;
//!
//! let config = FlattenConfig::load("config.json").unwrap();
//! println!("reading {}", config.input_path().display());
//! if let Some(titles) = config.title_filter() {
//!     println!("keeping {} form title(s)", titles.len());
//! }
//! ```

mod config;
mod error;

pub use config::{DEFAULT_CONFIG_FILE, DEFAULT_INPUT_CSV, DEFAULT_OUTPUT_CSV, FlattenConfig};
pub use error::{ConfigError, Result};
