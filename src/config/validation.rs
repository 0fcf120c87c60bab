//! Configuration validation for intake-relay.
//!
//! Validation runs before any network or file access so a half-configured
//! relay never lists a folder it cannot log.

use super::types::{
    GoogleConfig, LogConfig, LogKind, NotifyConfig, RelayConfig, SourceConfig, SourceKind,
    WatchSettings,
};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for RelayConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.source.validate());
        errors.extend(self.log.validate());
        errors.extend(self.notify.validate());
        errors.extend(self.watch.validate());

        let needs_google =
            self.source.kind == SourceKind::Drive || self.log.kind == LogKind::Sheets;
        if needs_google {
            errors.extend(self.google.validate());
        }

        errors
    }
}

impl Validatable for SourceConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.folder.trim().is_empty() {
            let what = match self.kind {
                SourceKind::Drive => "Drive folder ID is required",
                SourceKind::Local => "local folder path is required",
            };
            errors.push(ConfigError::new("source.folder", what));
        }
        if self.kind == SourceKind::Drive && !is_http_url(&self.drive_api_base) {
            errors.push(ConfigError::new(
                "source.drive_api_base",
                format!("expected an http(s) URL, got '{}'", self.drive_api_base),
            ));
        }
        errors
    }
}

impl Validatable for LogConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        match self.kind {
            LogKind::Sheets => {
                if self.spreadsheet_id.trim().is_empty() {
                    errors.push(ConfigError::new(
                        "log.spreadsheet_id",
                        "spreadsheet ID is required for the sheets log",
                    ));
                }
                if self.sheet_name.trim().is_empty() {
                    errors.push(ConfigError::new("log.sheet_name", "sheet name is empty"));
                }
                let column_ok = !self.id_column.is_empty()
                    && self.id_column.chars().all(|c| c.is_ascii_alphabetic());
                if !column_ok {
                    errors.push(ConfigError::new(
                        "log.id_column",
                        format!("expected a column letter like 'B', got '{}'", self.id_column),
                    ));
                }
                if !is_http_url(&self.sheets_api_base) {
                    errors.push(ConfigError::new(
                        "log.sheets_api_base",
                        format!("expected an http(s) URL, got '{}'", self.sheets_api_base),
                    ));
                }
            }
            LogKind::Ndjson => {
                if self.path.is_none() {
                    errors.push(ConfigError::new(
                        "log.path",
                        "log file path is required for the ndjson log",
                    ));
                }
            }
        }
        errors
    }
}

impl Validatable for NotifyConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.url.trim().is_empty() {
            errors.push(ConfigError::new("notify.url", "notification URL is required"));
        } else if !is_http_url(&self.url) {
            errors.push(ConfigError::new(
                "notify.url",
                format!("expected an http(s) URL, got '{}'", self.url),
            ));
        }
        if self.timeout_secs == Some(0) {
            errors.push(ConfigError::new(
                "notify.timeout_secs",
                "timeout must be at least 1 second",
            ));
        }
        errors
    }
}

impl Validatable for GoogleConfig {
    fn validate(&self) -> Vec<ConfigError> {
        match self.access_token.as_deref() {
            Some(token) if !token.trim().is_empty() => Vec::new(),
            _ => vec![ConfigError::new(
                "google.access_token",
                format!(
                    "an access token is required for Drive/Sheets (set it in the config file or {})",
                    super::defaults::ACCESS_TOKEN_ENV
                ),
            )],
        }
    }
}

impl Validatable for WatchSettings {
    fn validate(&self) -> Vec<ConfigError> {
        match crate::watch::parse_duration(&self.interval) {
            Ok(d) if d.is_zero() => vec![ConfigError::new(
                "watch.interval",
                "interval must be greater than zero",
            )],
            Ok(_) => Vec::new(),
            Err(e) => vec![ConfigError::new("watch.interval", e.to_string())],
        }
    }
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
