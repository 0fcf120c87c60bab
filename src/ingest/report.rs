//! Per-run ingestion report.

use crate::model::{CandidateFile, LoggedFileRecord, ParsedName};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A file whose notification failed; it stays unlogged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub file_id: String,
    pub name: String,
    pub cause: String,
}

/// A new file found during a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingFile {
    pub file: CandidateFile,
    pub parsed: ParsedName,
}

/// What one ingestion pass did.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
    /// Files returned by the folder listing
    pub listed: usize,
    /// Files skipped because their ID was already in the log
    pub already_logged: usize,
    /// Records appended this run
    pub logged: Vec<LoggedFileRecord>,
    /// Files whose notification failed
    pub failed: Vec<FailedFile>,
    /// New files seen during a dry run
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pending: Vec<PendingFile>,
}

impl IngestReport {
    pub(crate) fn new(dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            dry_run,
            listed: 0,
            already_logged: 0,
            logged: Vec::new(),
            failed: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// New files seen this run, whatever happened to them.
    #[must_use]
    pub fn new_files(&self) -> usize {
        self.logged.len() + self.failed.len() + self.pending.len()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ts = self.started_at.with_timezone(&chrono::Local).format("%H:%M:%S");
        if self.dry_run {
            writeln!(
                f,
                "[{ts}] Dry run: {} listed, {} already logged, {} new",
                self.listed,
                self.already_logged,
                self.pending.len()
            )?;
            for p in &self.pending {
                writeln!(
                    f,
                    "  {} [{}] -> index {}, name '{}'",
                    p.file.name,
                    p.file.id,
                    p.parsed.index.as_deref().unwrap_or("-"),
                    p.parsed.clean_name
                )?;
            }
            return Ok(());
        }

        writeln!(
            f,
            "[{ts}] {} listed | {} already logged | {} logged | {} failed",
            self.listed,
            self.already_logged,
            self.logged.len(),
            self.failed.len()
        )?;
        for r in &self.logged {
            writeln!(
                f,
                "  + {} [{}] index {}",
                r.clean_name,
                r.file_id,
                r.index.as_deref().unwrap_or("-")
            )?;
        }
        for failed in &self.failed {
            writeln!(f, "  ! {} [{}]: {}", failed.name, failed.file_id, failed.cause)?;
        }
        Ok(())
    }
}
