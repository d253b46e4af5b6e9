//! Run configuration.
//!
//! Handles loading, validating, and merging `regatta.toml`. All keys are
//! optional: the file is a sparse overlay merged key-by-key on top of the
//! stock defaults, so a config that only changes the locale looks like:
//!
//! ```toml
//! locale = "nl-NL"
//! ```
//!
//! A missing file is not an error; the stock defaults are used as-is.
//!
//! ## Configuration Options
//!
//! ```toml
//! base_url = "https://www.manage2sail.com"
//! locale = "en-EN"
//!
//! [catalog]
//! results_markers = ["Class has results", "Klasse heeft uitslagen"]
//! pairing = "positional"     # positional | strict | by-row
//!
//! [http]
//! # timeout_secs = 30       # omit for the client default
//! user_agent = "regatta-sheet/<version>"
//!
//! [export]
//! filename = "event-name"   # event-name | fixed
//! fixed_filename = "results.xlsx"
//! # sheet_title = "Results" # omit to use the class name
//! discard_color = "FFFF0000"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Scheme and host of the regatta site, without a trailing path.
    pub base_url: String,
    /// Locale segment used when rebuilding an event listing URL.
    pub locale: String,
    /// Class catalog extraction.
    pub catalog: CatalogConfig,
    /// HTTP client settings.
    pub http: HttpConfig,
    /// Workbook output.
    pub export: ExportConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.manage2sail.com".to_string(),
            locale: "en-EN".to_string(),
            catalog: CatalogConfig::default(),
            http: HttpConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl RunConfig {
    /// Validate config values are usable before any request is made.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "base_url must start with http:// or https://".into(),
            ));
        }
        if self.locale.trim().is_empty() {
            return Err(ConfigError::Validation("locale must not be empty".into()));
        }
        if self.catalog.results_markers.is_empty()
            || self.catalog.results_markers.iter().any(|m| m.is_empty())
        {
            return Err(ConfigError::Validation(
                "catalog.results_markers must list at least one non-empty marker".into(),
            ));
        }
        if self.http.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "http.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.export.fixed_filename.trim().is_empty() {
            return Err(ConfigError::Validation(
                "export.fixed_filename must not be empty".into(),
            ));
        }
        if !is_hex_color(&self.export.discard_color) {
            return Err(ConfigError::Validation(format!(
                "export.discard_color must be RRGGBB or AARRGGBB hex, got '{}'",
                self.export.discard_color
            )));
        }
        Ok(())
    }
}

fn is_hex_color(s: &str) -> bool {
    matches!(s.len(), 6 | 8) && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// How class names are matched to their results links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pairing {
    /// Zip names and marked links by position; extra entries on either side
    /// are dropped.
    #[default]
    Positional,
    /// Like `Positional`, but unequal counts are an error.
    Strict,
    /// Pair the name and the marked link found in the same table row.
    ByRow,
}

/// Class catalog extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Icon titles that mark a class as having published results.
    /// A link matches when its title equals any of them.
    pub results_markers: Vec<String>,
    pub pairing: Pairing,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            results_markers: vec![
                "Class has results".to_string(),
                "Klasse heeft uitslagen".to_string(),
            ],
            pairing: Pairing::default(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Whole-request timeout. When absent the client default applies.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

/// Where the workbook filename comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilenameStrategy {
    /// `<event name>.xlsx`
    #[default]
    EventName,
    /// `export.fixed_filename`
    Fixed,
}

/// Workbook output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub filename: FilenameStrategy,
    pub fixed_filename: String,
    /// Worksheet title. When absent the class name is used.
    pub sheet_title: Option<String>,
    /// Solid fill applied to discarded race scores.
    pub discard_color: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: FilenameStrategy::default(),
            fixed_filename: "results.xlsx".to_string(),
            sheet_title: None,
            discard_color: "FFFF0000".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(RunConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<RunConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: RunConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load and validate the config at `path`, falling back to stock defaults.
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `regatta.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# regatta-sheet configuration
# ===========================
# All settings are optional. Values shown are the defaults.
# Unknown keys will cause an error.

# Scheme and host of the regatta site.
base_url = "https://www.manage2sail.com"

# Locale segment used to rebuild the event listing URL
# (<base_url>/<locale>/event/<id>). Ignored with --direct.
locale = "en-EN"

# ---------------------------------------------------------------------------
# Class catalog
# ---------------------------------------------------------------------------
[catalog]
# Icon titles marking a class link as "has results". Any match counts,
# so one list covers the English and Dutch pages.
results_markers = ["Class has results", "Klasse heeft uitslagen"]

# How class names are matched to results links:
#   positional - zip names and marked links in page order (site default
#                behaviour; silently drops extras, logs a warning)
#   strict     - positional, but unequal counts abort the run
#   by-row     - take name and link from the same table row
pairing = "positional"

# ---------------------------------------------------------------------------
# HTTP
# ---------------------------------------------------------------------------
[http]
# Whole-request timeout in seconds. Omit to use the client default.
# timeout_secs = 30

# User-Agent header sent with every request.
# user_agent = "regatta-sheet/<version>"

# ---------------------------------------------------------------------------
# Workbook export
# ---------------------------------------------------------------------------
[export]
# Output filename: "event-name" writes "<event name>.xlsx",
# "fixed" writes fixed_filename.
filename = "event-name"
fixed_filename = "results.xlsx"

# Worksheet title. Omit to use the class name.
# sheet_title = "Results"

# Fill color (RRGGBB or AARRGGBB) for discarded race scores.
discard_color = "FFFF0000"
"##
}
