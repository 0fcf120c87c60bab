//! CLI handler for the `watch` subcommand.

use super::{ensure_valid, OutputOptions};
use crate::config::RelayConfig;
use crate::log_store::build_log_store;
use crate::notify::HttpNotifier;
use crate::output::build_sinks;
use crate::source::build_source;
use crate::watch::{parse_duration, run_watch_loop, WatchConfig, WatchSummary};
use anyhow::Result;

/// Run the watch command with the given configuration.
pub fn run_watch(
    config: &RelayConfig,
    max_runs: Option<u64>,
    status_every: u64,
    dry_run: bool,
    output: &OutputOptions,
) -> Result<WatchSummary> {
    ensure_valid(config)?;

    let watch = WatchConfig {
        interval: parse_duration(&config.watch.interval)?,
        max_runs,
        status_every,
        dry_run,
    };

    let source = build_source(config)?;
    let mut log = build_log_store(config)?;
    let notifier = HttpNotifier::from_config(&config.notify)?;
    let mut sinks = build_sinks(output.format, output.file.as_deref(), output.quiet)?;

    run_watch_loop(&watch, source.as_ref(), log.as_mut(), &notifier, &mut sinks)
}
