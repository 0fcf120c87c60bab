//! Log stores: the append-only record of relayed files.
//!
//! A store is read once per run (the identifier column) and appended to
//! once per successfully relayed file. Nothing updates or deletes rows.

mod ndjson;
mod sheets;

pub use ndjson::NdjsonLog;
pub use sheets::{SheetsLog, SheetsLogConfig};

use crate::config::{LogKind, RelayConfig};
use crate::error::{RelayError, Result};
use crate::model::{KnownIds, LoggedFileRecord};

/// Trait for log store backends.
pub trait LogStore {
    /// Read every file ID already recorded in the log.
    fn known_ids(&self) -> Result<KnownIds>;

    /// Append one record as a new row.
    fn append(&mut self, record: &LoggedFileRecord) -> Result<()>;

    /// Short backend name for diagnostics (e.g. "sheets").
    fn name(&self) -> &'static str;
}

/// Build the log store selected by the configuration.
pub fn build_log_store(config: &RelayConfig) -> Result<Box<dyn LogStore>> {
    match config.log.kind {
        LogKind::Sheets => {
            let token = config
                .google
                .access_token
                .clone()
                .ok_or_else(|| RelayError::config("Sheets log requires google.access_token"))?;
            Ok(Box::new(SheetsLog::new(SheetsLogConfig {
                spreadsheet_id: config.log.spreadsheet_id.clone(),
                sheet_name: config.log.sheet_name.clone(),
                id_column: config.log.id_column.clone(),
                api_base: config.log.sheets_api_base.clone(),
                access_token: token,
            })))
        }
        LogKind::Ndjson => {
            let path = config
                .log
                .path
                .clone()
                .ok_or_else(|| RelayError::config("ndjson log requires log.path"))?;
            Ok(Box::new(NdjsonLog::new(path)))
        }
    }
}
