//! Configuration types for intake-relay.
//!
//! The folder, the log spreadsheet and the notification endpoint are all
//! carried here and passed into a run; nothing is hardcoded.

use super::defaults::{
    DEFAULT_DRIVE_API_BASE, DEFAULT_ID_COLUMN, DEFAULT_SHEETS_API_BASE, DEFAULT_SHEET_NAME,
    DEFAULT_WATCH_INTERVAL,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Top-level configuration
// ============================================================================

/// Complete relay configuration, loaded from a YAML file and CLI overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RelayConfig {
    /// Where uploaded files are listed from
    pub source: SourceConfig,
    /// Where relayed files are recorded
    pub log: LogConfig,
    /// Endpoint notified once per new file
    pub notify: NotifyConfig,
    /// Google API credentials shared by the Drive and Sheets backends
    pub google: GoogleConfig,
    /// Settings for the `watch` command
    pub watch: WatchSettings,
}

impl RelayConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RelayConfigBuilder {
        RelayConfigBuilder::default()
    }

    /// Copy of this config that is safe to print.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.google.access_token.is_some() {
            copy.google.access_token = Some("<redacted>".to_string());
        }
        copy
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for constructing `RelayConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct RelayConfigBuilder {
    config: RelayConfig,
}

impl RelayConfigBuilder {
    /// List files from a Google Drive folder.
    pub fn drive_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.config.source.kind = SourceKind::Drive;
        self.config.source.folder = folder_id.into();
        self
    }

    /// List files from a local directory.
    pub fn local_folder(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.source.kind = SourceKind::Local;
        self.config.source.folder = dir.into().display().to_string();
        self
    }

    /// Only list PDF files.
    pub const fn pdf_only(mut self, pdf_only: bool) -> Self {
        self.config.source.pdf_only = pdf_only;
        self
    }

    /// Record relayed files in a Google Sheets spreadsheet.
    pub fn sheets_log(mut self, spreadsheet_id: impl Into<String>) -> Self {
        self.config.log.kind = LogKind::Sheets;
        self.config.log.spreadsheet_id = spreadsheet_id.into();
        self
    }

    /// Record relayed files in a local NDJSON file.
    pub fn ndjson_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log.kind = LogKind::Ndjson;
        self.config.log.path = Some(path.into());
        self
    }

    /// Set the notification endpoint URL.
    pub fn notify_url(mut self, url: impl Into<String>) -> Self {
        self.config.notify.url = url.into();
        self
    }

    /// Treat non-2xx notification responses as failures.
    pub const fn require_success_status(mut self, require: bool) -> Self {
        self.config.notify.require_success_status = require;
        self
    }

    /// Set the Google API access token.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config.google.access_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn build(self) -> RelayConfig {
        self.config
    }
}

// ============================================================================
// Source
// ============================================================================

/// Folder listing backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Google Drive folder
    #[default]
    Drive,
    /// Local directory
    Local,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Drive => write!(f, "drive"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// Source folder configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SourceConfig {
    /// Backend used to list the folder
    pub kind: SourceKind,
    /// Drive folder ID, or directory path for the local backend
    pub folder: String,
    /// Only list PDF files
    pub pdf_only: bool,
    /// Drive API base URL
    pub drive_api_base: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Drive,
            folder: String::new(),
            pdf_only: false,
            drive_api_base: DEFAULT_DRIVE_API_BASE.to_string(),
        }
    }
}

// ============================================================================
// Log store
// ============================================================================

/// Log store backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    /// Google Sheets spreadsheet
    #[default]
    Sheets,
    /// Local newline-delimited JSON file
    Ndjson,
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sheets => write!(f, "sheets"),
            Self::Ndjson => write!(f, "ndjson"),
        }
    }
}

/// Log store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LogConfig {
    /// Backend used to store log rows
    pub kind: LogKind,
    /// Spreadsheet ID (sheets backend)
    pub spreadsheet_id: String,
    /// Sheet (tab) name holding the log (sheets backend)
    pub sheet_name: String,
    /// Column letter holding file IDs (sheets backend)
    pub id_column: String,
    /// Log file path (ndjson backend)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Sheets API base URL
    pub sheets_api_base: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            kind: LogKind::Sheets,
            spreadsheet_id: String::new(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            id_column: DEFAULT_ID_COLUMN.to_string(),
            path: None,
            sheets_api_base: DEFAULT_SHEETS_API_BASE.to_string(),
        }
    }
}

// ============================================================================
// Notification
// ============================================================================

/// Notification endpoint configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NotifyConfig {
    /// URL that receives `{"file_id": ...}` for each new file
    pub url: String,
    /// Request timeout in seconds (client default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Treat non-2xx responses as failed deliveries
    pub require_success_status: bool,
}

// ============================================================================
// Google credentials
// ============================================================================

/// Pre-provisioned Google API credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GoogleConfig {
    /// OAuth2 bearer token for Drive and Sheets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

// ============================================================================
// Watch
// ============================================================================

/// Settings for repeated runs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WatchSettings {
    /// Interval between runs (e.g. 30s, 5m, 1h)
    pub interval: String,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_WATCH_INTERVAL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = RelayConfig::builder()
            .drive_folder("folder-1")
            .sheets_log("sheet-1")
            .notify_url("https://example.com/hook")
            .access_token("tok")
            .build();

        assert_eq!(config.source.kind, SourceKind::Drive);
        assert_eq!(config.source.folder, "folder-1");
        assert_eq!(config.log.spreadsheet_id, "sheet-1");
        assert_eq!(config.log.sheet_name, "Log");
        assert_eq!(config.log.id_column, "B");
        assert_eq!(config.notify.url, "https://example.com/hook");
        assert!(!config.notify.require_success_status);
    }

    #[test]
    fn test_redacted_hides_token() {
        let config = RelayConfig::builder().access_token("secret").build();
        let shown = config.redacted();
        assert_eq!(shown.google.access_token.as_deref(), Some("<redacted>"));
        assert_eq!(config.google.access_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_kind_yaml_names() {
        let config: RelayConfig =
            serde_yaml::from_str("source:\n  kind: local\nlog:\n  kind: ndjson\n").unwrap();
        assert_eq!(config.source.kind, SourceKind::Local);
        assert_eq!(config.log.kind, LogKind::Ndjson);
    }
}
