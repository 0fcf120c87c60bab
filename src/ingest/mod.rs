//! The ingestion run: list, dedup, parse, notify, log.
//!
//! One call to [`run_ingestion`] is one pass over the folder. Files are
//! handled sequentially. A failed notification skips that file (it stays
//! unlogged and is tried again next run, with no limit) and the pass moves
//! on. A folder or log store error aborts the pass, including a failed
//! append after the endpoint already accepted the file; that file stays
//! unlogged and is notified again on the next pass.

mod report;

pub use report::{FailedFile, IngestReport, PendingFile};

use crate::error::{ErrorContext, Result};
use crate::log_store::LogStore;
use crate::model::{LoggedFileRecord, ParsedName};
use crate::notify::Notifier;
use crate::source::FolderSource;
use chrono::Utc;

/// Per-run options.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    /// Report new files without notifying or logging them
    pub dry_run: bool,
}

/// Run one ingestion pass.
///
/// The known-identifier set is read once, before listing; records appended
/// during this pass are not re-read.
pub fn run_ingestion(
    source: &dyn FolderSource,
    log: &mut dyn LogStore,
    notifier: &dyn Notifier,
    options: IngestOptions,
) -> Result<IngestReport> {
    let mut report = IngestReport::new(options.dry_run);

    let known = log
        .known_ids()
        .with_context(|| format!("loading known file IDs from {} log", log.name()))?;
    tracing::debug!("{} file ID(s) already logged", known.len());

    let files = source
        .list_files()
        .with_context(|| format!("listing {} folder", source.name()))?;
    report.listed = files.len();

    for file in files {
        if known.contains(&file.id) {
            report.already_logged += 1;
            continue;
        }

        let parsed = ParsedName::from_file_name(&file.name);
        let detected_at = Utc::now();
        tracing::info!(
            "New file uploaded: {} (id {}, index {}, clean name '{}', at {})",
            file.name,
            file.id,
            parsed.index.as_deref().unwrap_or("-"),
            parsed.clean_name,
            detected_at.to_rfc3339(),
        );

        if options.dry_run {
            report.pending.push(PendingFile { file, parsed });
            continue;
        }

        let outcome = notifier.notify(&file.id);
        if outcome.should_log() {
            tracing::info!("Endpoint response for {}: {}", file.id, outcome.describe());
            let record = LoggedFileRecord::new(&file, parsed, Utc::now());
            log.append(&record)
                .with_context(|| format!("logging {} ({})", file.name, file.id))?;
            report.logged.push(record);
        } else {
            let cause = outcome.describe();
            tracing::warn!("Failed to notify endpoint for {} ({}): {cause}", file.name, file.id);
            report.failed.push(FailedFile {
                file_id: file.id,
                name: file.name,
                cause,
            });
        }
    }

    report.finish();
    Ok(report)
}
