//! Default values for intake-relay configuration.

/// Google Drive v3 API base URL.
pub const DEFAULT_DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Google Sheets v4 API base URL.
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

/// Sheet (tab) holding the relay log.
pub const DEFAULT_SHEET_NAME: &str = "Log";

/// Column holding file IDs; rows are `[index, file_id, clean_name, timestamp]`.
pub const DEFAULT_ID_COLUMN: &str = "B";

/// Interval between runs in watch mode.
pub const DEFAULT_WATCH_INTERVAL: &str = "5m";

/// Drive `files.list` page size.
pub const DRIVE_PAGE_SIZE: u32 = 1000;

/// Environment variable consulted for the Google access token.
pub const ACCESS_TOKEN_ENV: &str = "INTAKE_RELAY_ACCESS_TOKEN";
