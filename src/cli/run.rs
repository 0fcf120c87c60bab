//! CLI handler for the `run` subcommand.

use super::ensure_valid;
use crate::config::RelayConfig;
use crate::ingest::{run_ingestion, IngestOptions, IngestReport};
use crate::log_store::build_log_store;
use crate::notify::HttpNotifier;
use crate::output::{build_sinks, emit, OutputFormat};
use crate::source::build_source;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Where and how run reports are written.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub format: OutputFormat,
    /// NDJSON output file (stdout if not specified)
    pub file: Option<PathBuf>,
    pub quiet: bool,
}

/// Run a single ingestion pass.
///
/// Notification failures are part of the returned report; only folder,
/// log store or configuration errors make this return `Err`.
pub fn run_once(config: &RelayConfig, dry_run: bool, output: &OutputOptions) -> Result<IngestReport> {
    ensure_valid(config)?;

    let source = build_source(config)?;
    let mut log = build_log_store(config)?;
    let notifier = HttpNotifier::from_config(&config.notify)?;
    let mut sinks = build_sinks(output.format, output.file.as_deref(), output.quiet)?;

    let report = run_ingestion(
        source.as_ref(),
        log.as_mut(),
        &notifier,
        IngestOptions { dry_run },
    )
    .with_context(|| format!("ingestion from {} folder failed", config.source.kind))?;

    emit(&mut sinks, |s| s.on_run(&report));
    Ok(report)
}
