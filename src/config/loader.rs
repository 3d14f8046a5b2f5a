// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_IDENTITY_FIELD, DEFAULT_QUIET_PERIOD_MS,
    DEFAULT_SWEEP_INTERVAL_MS,
};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for the aggregation engine.
///
/// Loaded from a YAML file. Every tunable is optional and falls back to the
/// constants in [`crate::config::consts`]; only the record kind registry is
/// required.
///
/// # Example
/// ```yaml
/// quiet_period_ms: 5000
/// sweep_interval_ms: 1000
/// page_backup_enabled: true
/// endpoints:
///   patterns: [list_buddy, list_other]
/// record_kinds:
///   - name: soul_breaks
///     source_key: soul_strikes
///     paginated: true
///     fields: [id, name, description]
/// sinks:
///   - type: csv
///     output_dir: stitched_data
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub quiet_period_ms: Option<u64>,
    pub sweep_interval_ms: Option<u64>,
    pub channel_capacity: Option<usize>,
    #[serde(default)]
    pub page_backup_enabled: bool,
    #[serde(default)]
    pub raw_backup_enabled: bool,
    #[serde(default)]
    pub endpoints: EndpointOptions,
    pub record_kinds: Vec<RecordKindConfig>,
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

impl Config {
    /// Idle time after which an accumulating endpoint is presumed complete.
    ///
    /// This is a heuristic: the upstream service never marks the last page,
    /// so a longer value lowers the risk of finalizing during a slow page
    /// while delaying results by the same amount.
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms.unwrap_or(DEFAULT_QUIET_PERIOD_MS))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms.unwrap_or(DEFAULT_SWEEP_INTERVAL_MS))
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity.unwrap_or(DEFAULT_CHANNEL_CAPACITY)
    }
}

/// Which responses are considered and how their endpoint key is derived.
///
/// # Fields
/// * `patterns` - case-insensitive URL substrings; a response matching none
///   of them is ignored. Empty means every response is considered.
/// * `identity_query_params` - query parameters kept in the endpoint key
///   because they select a different data set rather than a different page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointOptions {
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub identity_query_params: Vec<String>,
}

/// Configuration for a single record kind.
///
/// # Example
/// ```yaml
/// name: dress_records
/// source_key: dress_records
/// paginated: false
/// identity_field: id
/// fields: [id, name, description, image_path, series_id]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RecordKindConfig {
    pub name: String,
    /// Payload key holding this kind's item array.
    pub source_key: String,
    #[serde(default)]
    pub paginated: bool,
    #[serde(default = "default_identity_field")]
    pub identity_field: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

fn default_identity_field() -> String {
    DEFAULT_IDENTITY_FIELD.to_string()
}

/// A consumer of dispatched item sets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkConfig {
    /// One CSV file per dispatch under `output_dir`.
    Csv { output_dir: PathBuf },
    /// A one-line log summary per dispatch.
    Log,
}

/// Parse a config from YAML text without validating it.
pub fn parse_config(yaml: &str) -> Result<Config, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load and validate a config from a YAML file
///
/// Every validation problem is reported at once in [`ConfigError::Invalid`].
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}
