//! Flattening run configuration.
//!
//! Every option is optional. Column overrides and lists are read leniently:
//! a value of the wrong shape is treated as if it were absent, so a sloppy
//! config never prevents a run that the column sniffer can still complete.
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "input_csv": "splose_export.csv",
//!   "output_csv": "splose_flattened.csv",
//!   "form_titles": ["Initial Assessment"],
//!   "payload_col": "Json",
//!   "meta_cols": ["Client Name", "Title", "Submittted At"],
//!   "other_interested_keys": ["notes"],
//!   "date_from": "2024-01-01"
//! }
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use form_flatten_core::normalize_title;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ConfigError, Result};

/// Config file read when no path is given explicitly.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";
/// Input table used when `input_csv` is not configured.
pub const DEFAULT_INPUT_CSV: &str = "splose_export.csv";
/// Output table used when `output_csv` is not configured.
pub const DEFAULT_OUTPUT_CSV: &str = "splose_flattened.csv";

/// Top-level flattening configuration.
///
/// # Examples
///
/// ```
/// use form_flatten_config::FlattenConfig;
///
/// let config = FlattenConfig::from_json_str(r#"{
///     "form_titles": ["  Initial   Assessment "],
///     "title_col": "",
///     "meta_cols": "not a list"
/// }"#).unwrap();
///
/// assert_eq!(config.title_filter().unwrap(), ["Initial Assessment".to_string()]);
/// assert_eq!(config.title_col, None);
/// assert_eq!(config.meta_cols, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlattenConfig {
    /// Input table path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_csv: Option<PathBuf>,
    /// Output table path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_csv: Option<PathBuf>,
    /// Form titles to keep; absent or empty disables title filtering.
    #[serde(default, deserialize_with = "string_list", skip_serializing_if = "Option::is_none")]
    pub form_titles: Option<Vec<String>>,
    /// Column holding the form title (sniffed when absent).
    #[serde(default, deserialize_with = "column_name", skip_serializing_if = "Option::is_none")]
    pub title_col: Option<String>,
    /// Column holding the JSON payload (sniffed when absent).
    #[serde(default, deserialize_with = "column_name", skip_serializing_if = "Option::is_none")]
    pub payload_col: Option<String>,
    /// Column holding the submission date (sniffed when absent).
    #[serde(default, deserialize_with = "column_name", skip_serializing_if = "Option::is_none")]
    pub date_col: Option<String>,
    /// Explicit output meta columns.
    #[serde(default, deserialize_with = "string_list", skip_serializing_if = "Option::is_none")]
    pub meta_cols: Option<Vec<String>>,
    /// Extra question fields consulted for question types without a dedicated rule.
    #[serde(default, deserialize_with = "string_list", skip_serializing_if = "Option::is_none")]
    pub other_interested_keys: Option<Vec<String>>,
    /// Earliest submission date to keep (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    /// Latest submission date to keep (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

impl FlattenConfig {
    /// Loads configuration from a `.json`, `.yml` or `.yaml` file.
    ///
    /// Files without an extension are read as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be read,
    /// [`JsonError`](ConfigError::JsonError) / [`YamlError`](ConfigError::YamlError)
    /// if parsing fails, [`UnsupportedFormat`](ConfigError::UnsupportedFormat)
    /// for other extensions, and [`Invalid`](ConfigError::Invalid) if the
    /// top level is not a record or the options contradict each other.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
        match extension.as_deref() {
            None | Some("json") => {
                let file = std::fs::File::open(path)?;
                let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;
                Self::from_json_value(value)
            }
            Some("yml" | "yaml") => {
                let file = std::fs::File::open(path)?;
                let value: serde_yaml::Value = serde_yaml::from_reader(BufReader::new(file))?;
                if !value.is_mapping() {
                    return Err(ConfigError::Invalid("config must be a YAML mapping".into()));
                }
                let config: Self = serde_yaml::from_value(value)?;
                config.normalized()
            }
            Some(other) => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Loads `explicit` when given; otherwise loads [`DEFAULT_CONFIG_FILE`]
    /// if it exists in the working directory, falling back to defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parses configuration from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Self::from_json_value(serde_json::from_str(raw)?)
    }

    fn from_json_value(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ConfigError::Invalid("config must be a JSON object".into()));
        }
        let config: Self = serde_json::from_value(value)?;
        config.normalized()
    }

    fn normalized(mut self) -> Result<Self> {
        if self
            .input_csv
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::Invalid("input_csv must not be empty".into()));
        }
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(ConfigError::Invalid(format!(
                    "date_from ({from}) is after date_to ({to})"
                )));
            }
        }
        if let Some(titles) = self.form_titles.as_mut() {
            for title in titles.iter_mut() {
                *title = normalize_title(title);
            }
        }
        Ok(self)
    }

    /// Input table path, defaulting to [`DEFAULT_INPUT_CSV`].
    pub fn input_path(&self) -> &Path {
        self.input_csv
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_INPUT_CSV))
    }

    /// Output table path, defaulting to [`DEFAULT_OUTPUT_CSV`].
    pub fn output_path(&self) -> &Path {
        self.output_csv
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new(DEFAULT_OUTPUT_CSV))
    }

    /// Normalized form-title allow-list, or `None` when title filtering is off.
    pub fn title_filter(&self) -> Option<&[String]> {
        self.form_titles
            .as_deref()
            .filter(|titles| !titles.is_empty())
    }

    /// Extra answer keys for the generic extraction rule.
    pub fn extra_answer_keys(&self) -> &[String] {
        self.other_interested_keys.as_deref().unwrap_or_default()
    }

    /// Returns `true` if either end of the submission date range is set.
    pub fn has_date_range(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }
}

/// Accepts a list made only of strings; anything else reads as absent.
fn string_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => None,
    })
}

/// Accepts a non-empty string; anything else reads as absent.
fn column_name<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "input_csv": "in.csv",
            "output_csv": "out.csv",
            "form_titles": ["Initial  Assessment", " Follow up "],
            "title_col": "Title",
            "payload_col": "Json",
            "date_col": "Submittted At",
            "meta_cols": ["Client Name", "Title"],
            "other_interested_keys": ["notes", "value"],
            "date_from": "2024-01-01",
            "date_to": "2024-06-30"
        }"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config = FlattenConfig::from_json_str(sample_json()).unwrap();
        assert_eq!(config.input_path(), Path::new("in.csv"));
        assert_eq!(config.output_path(), Path::new("out.csv"));
        assert_eq!(
            config.title_filter().unwrap(),
            ["Initial Assessment".to_string(), "Follow up".to_string()]
        );
        assert_eq!(config.title_col.as_deref(), Some("Title"));
        assert_eq!(config.payload_col.as_deref(), Some("Json"));
        assert_eq!(config.date_col.as_deref(), Some("Submittted At"));
        assert_eq!(config.meta_cols.as_ref().unwrap().len(), 2);
        assert_eq!(config.extra_answer_keys(), ["notes", "value"]);
        assert_eq!(config.date_from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert!(config.has_date_range());
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = FlattenConfig::from_json_str("{}").unwrap();
        assert_eq!(config, FlattenConfig::default());
        assert_eq!(config.input_path(), Path::new(DEFAULT_INPUT_CSV));
        assert_eq!(config.output_path(), Path::new(DEFAULT_OUTPUT_CSV));
        assert!(config.title_filter().is_none());
        assert!(config.extra_answer_keys().is_empty());
        assert!(!config.has_date_range());
    }

    #[test]
    fn test_empty_title_list_disables_filter() {
        let config = FlattenConfig::from_json_str(r#"{"form_titles": []}"#).unwrap();
        assert!(config.title_filter().is_none());
    }

    #[test]
    fn test_wrong_shapes_read_as_absent() {
        let config = FlattenConfig::from_json_str(
            r#"{
                "form_titles": "Initial Assessment",
                "meta_cols": ["ok", 3],
                "payload_col": 12,
                "date_col": null,
                "other_interested_keys": {"a": 1}
            }"#,
        )
        .unwrap();
        assert!(config.form_titles.is_none());
        assert!(config.meta_cols.is_none());
        assert!(config.payload_col.is_none());
        assert!(config.date_col.is_none());
        assert!(config.other_interested_keys.is_none());
    }

    #[test]
    fn test_top_level_must_be_object() {
        let err = FlattenConfig::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_empty_input_path_rejected() {
        let err = FlattenConfig::from_json_str(r#"{"input_csv": ""}"#).unwrap_err();
        assert!(err.to_string().contains("input_csv"));
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        let err = FlattenConfig::from_json_str(r#"{"date_from": "01/02/2024"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::JsonError(_)));
    }

    #[test]
    fn test_inverted_date_range_rejected() {
        let err = FlattenConfig::from_json_str(
            r#"{"date_from": "2024-05-01", "date_to": "2024-01-01"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "input_csv: export.csv\nform_titles:\n  - Intake  Form\npayload_col: Json\n",
        )
        .unwrap();

        let config = FlattenConfig::load(&path).unwrap();
        assert_eq!(config.input_path(), Path::new("export.csv"));
        assert_eq!(config.title_filter().unwrap(), ["Intake Form".to_string()]);
        assert_eq!(config.payload_col.as_deref(), Some("Json"));
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, sample_json()).unwrap();
        let config = FlattenConfig::load(&path).unwrap();
        assert_eq!(config.title_col.as_deref(), Some("Title"));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "x = 1").unwrap();
        let err = FlattenConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "toml"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = FlattenConfig::load_or_default(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
