//! Local NDJSON log store: one JSON record per line, append-only.

use super::LogStore;
use crate::error::{LogStoreErrorKind, RelayError, Result};
use crate::model::{KnownIds, LoggedFileRecord};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Log store backed by a local newline-delimited JSON file.
///
/// A missing file is an empty log; it is created on the first append.
#[derive(Debug, Clone)]
pub struct NdjsonLog {
    path: PathBuf,
}

impl NdjsonLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record in file order.
    pub fn records(&self) -> Result<Vec<LoggedFileRecord>> {
        let file = match std::fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RelayError::io(&self.path, e)),
        };

        let mut records = Vec::new();
        for (n, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| RelayError::io(&self.path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let record: LoggedFileRecord = serde_json::from_str(&line).map_err(|e| {
                RelayError::log_store(
                    format!("reading {}", self.path.display()),
                    LogStoreErrorKind::MalformedRow {
                        line: n + 1,
                        message: e.to_string(),
                    },
                )
            })?;
            records.push(record);
        }
        Ok(records)
    }
}

impl LogStore for NdjsonLog {
    fn known_ids(&self) -> Result<KnownIds> {
        let records = self.records()?;
        Ok(KnownIds::from_column(records.iter().map(|r| r.file_id.as_str())))
    }

    fn append(&mut self, record: &LoggedFileRecord) -> Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| RelayError::io(&self.path, e))?;

        let mut line = serde_json::to_vec(record).map_err(|e| {
            RelayError::log_store(
                format!("encoding {}", record.file_id),
                LogStoreErrorKind::InvalidResponse(e.to_string()),
            )
        })?;
        line.push(b'\n');
        file.write_all(&line)
            .and_then(|()| file.flush())
            .map_err(|e| RelayError::io(&self.path, e))
    }

    fn name(&self) -> &'static str {
        "ndjson"
    }
}
