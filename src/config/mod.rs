//! Configuration module for intake-relay.
//!
//! This module provides:
//! - Type-safe configuration structures for the folder source, log store,
//!   notification endpoint and watch mode
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.intake-relay.yaml` file in the working directory or
//! `~/.config/intake-relay/`:
//!
//! ```yaml
//! source:
//!   folder: 1AbCdEf
//! log:
//!   spreadsheet_id: 1XyZ
//! notify:
//!   url: https://example.com/process
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    ACCESS_TOKEN_ENV, DEFAULT_DRIVE_API_BASE, DEFAULT_ID_COLUMN, DEFAULT_SHEETS_API_BASE,
    DEFAULT_SHEET_NAME, DEFAULT_WATCH_INTERVAL, DRIVE_PAGE_SIZE,
};
pub use types::{
    GoogleConfig, LogConfig, LogKind, NotifyConfig, RelayConfig, RelayConfigBuilder,
    SourceConfig, SourceKind, WatchSettings,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    config_search_paths, discover_config_file, generate_example_config, load_config_file,
    load_or_default, CliOverrides, ConfigFileError,
};

/// Generate a JSON Schema for the `RelayConfig` configuration format.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(RelayConfig);
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}
