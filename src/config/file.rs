//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::defaults::{
    DEFAULT_DRIVE_API_BASE, DEFAULT_ID_COLUMN, DEFAULT_SHEETS_API_BASE, DEFAULT_SHEET_NAME,
    DEFAULT_WATCH_INTERVAL,
};
use super::types::{LogKind, RelayConfig, SourceKind};
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".intake-relay.yaml",
    ".intake-relay.yml",
    "intake-relay.yaml",
    "intake-relay.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/intake-relay/)
/// 4. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(path) = find_config_in_dir(&cwd) {
            return Some(path);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        if let Some(path) = find_config_in_dir(&config_dir.join("intake-relay")) {
            return Some(path);
        }
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Search locations printed by `config path`.
#[must_use]
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut dirs_to_search = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs_to_search.push(cwd);
    }
    if let Some(config_dir) = dirs::config_dir() {
        dirs_to_search.push(config_dir.join("intake-relay"));
    }
    if let Some(home) = dirs::home_dir() {
        dirs_to_search.push(home);
    }

    dirs_to_search
        .iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .collect()
}

fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load a `RelayConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<RelayConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: RelayConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from the discovered file, or return the default when none exists.
///
/// A file that exists but cannot be read or parsed is an error: running
/// with defaults would silently point the relay somewhere else.
pub fn load_or_default(
    explicit_path: Option<&Path>,
) -> Result<(RelayConfig, Option<PathBuf>), ConfigFileError> {
    match discover_config_file(explicit_path) {
        Some(path) => {
            let config = load_config_file(&path)?;
            tracing::debug!("Loaded config from {}", path.display());
            Ok((config, Some(path)))
        }
        None => Ok((RelayConfig::default(), None)),
    }
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl RelayConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only values that differ from the defaults override, so CLI flags that
    /// were not given leave file settings alone.
    pub fn merge(&mut self, other: &Self) {
        // Source
        if other.source.kind != SourceKind::default() {
            self.source.kind = other.source.kind;
        }
        if !other.source.folder.is_empty() {
            self.source.folder.clone_from(&other.source.folder);
        }
        if other.source.pdf_only {
            self.source.pdf_only = true;
        }
        if other.source.drive_api_base != DEFAULT_DRIVE_API_BASE {
            self.source.drive_api_base.clone_from(&other.source.drive_api_base);
        }

        // Log
        if other.log.kind != LogKind::default() {
            self.log.kind = other.log.kind;
        }
        if !other.log.spreadsheet_id.is_empty() {
            self.log.spreadsheet_id.clone_from(&other.log.spreadsheet_id);
        }
        if other.log.sheet_name != DEFAULT_SHEET_NAME {
            self.log.sheet_name.clone_from(&other.log.sheet_name);
        }
        if other.log.id_column != DEFAULT_ID_COLUMN {
            self.log.id_column.clone_from(&other.log.id_column);
        }
        if other.log.path.is_some() {
            self.log.path.clone_from(&other.log.path);
        }
        if other.log.sheets_api_base != DEFAULT_SHEETS_API_BASE {
            self.log.sheets_api_base.clone_from(&other.log.sheets_api_base);
        }

        // Notify
        if !other.notify.url.is_empty() {
            self.notify.url.clone_from(&other.notify.url);
        }
        if other.notify.timeout_secs.is_some() {
            self.notify.timeout_secs = other.notify.timeout_secs;
        }
        if other.notify.require_success_status {
            self.notify.require_success_status = true;
        }

        // Google
        if other.google.access_token.is_some() {
            self.google.access_token.clone_from(&other.google.access_token);
        }

        // Watch
        if other.watch.interval != DEFAULT_WATCH_INTERVAL {
            self.watch.interval.clone_from(&other.watch.interval);
        }
    }

    /// Apply command-line overrides on top of this config.
    ///
    /// Backend kinds given on the command line always win, including when
    /// they name the default backend.
    pub fn apply_overrides(&mut self, overrides: &CliOverrides) {
        self.merge(&overrides.values);
        if let Some(kind) = overrides.source_kind {
            self.source.kind = kind;
        }
        if let Some(kind) = overrides.log_kind {
            self.log.kind = kind;
        }
    }

    /// Load from file and apply CLI overrides.
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        overrides: &CliOverrides,
    ) -> Result<(Self, Option<PathBuf>), ConfigFileError> {
        let (mut config, loaded_from) = load_or_default(config_path)?;
        config.apply_overrides(overrides);
        Ok((config, loaded_from))
    }
}

/// Values given explicitly on the command line.
///
/// Backend kinds are tracked separately from `values` because the default
/// kind cannot be told apart from "not given" once it sits in a
/// [`RelayConfig`].
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub source_kind: Option<SourceKind>,
    pub log_kind: Option<LogKind>,
    /// Non-default values here replace file values
    pub values: RelayConfig,
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_example_config() -> String {
    r#"# intake-relay configuration
# Place this file at .intake-relay.yaml in the working directory
# or at ~/.config/intake-relay/intake-relay.yaml.
#
# CLI arguments always override file settings.

# Folder to poll for uploaded files
source:
  # Backend: drive or local
  kind: drive
  # Drive folder ID (or a directory path when kind is local)
  folder: "your-drive-folder-id"
  # Only list PDF files
  pdf_only: false

# Log of relayed files: rows of [index, file_id, clean_name, timestamp]
log:
  # Backend: sheets or ndjson
  kind: sheets
  spreadsheet_id: "your-spreadsheet-id"
  sheet_name: Log
  # Column that holds file IDs
  id_column: B
  # path: ./relay-log.ndjson   # ndjson backend only

# Endpoint called with {"file_id": "..."} for each new file
notify:
  url: "https://example.com/process"
  # timeout_secs: 60
  # Count non-2xx responses as failures (default: only transport errors fail)
  require_success_status: false

# Google API credentials (or set INTAKE_RELAY_ACCESS_TOKEN)
google: {}
  # access_token: "ya29...."

# watch command
watch:
  interval: 5m
"#
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
