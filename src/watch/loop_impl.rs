//! Main watch loop orchestrator.
//!
//! Runs one ingestion pass immediately, then one per interval, until
//! interrupted or the run limit is reached.

use super::config::WatchConfig;
use super::state::{WatchState, WatchSummary};
use crate::ingest::{run_ingestion, IngestOptions};
use crate::log_store::LogStore;
use crate::notify::Notifier;
use crate::output::{emit, RunSink};
use crate::source::FolderSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Longest uninterrupted sleep between stop-flag checks.
const SLEEP_SLICE: Duration = Duration::from_millis(250);

/// Run the main watch loop.
///
/// A pass that aborts (folder or log store unreachable) is reported to the
/// sinks and the loop carries on; the next pass starts from scratch.
/// Returns the session summary when interrupted or after
/// `config.max_runs` passes.
pub fn run_watch_loop(
    config: &WatchConfig,
    source: &dyn FolderSource,
    log: &mut dyn LogStore,
    notifier: &dyn Notifier,
    sinks: &mut [Box<dyn RunSink>],
) -> anyhow::Result<WatchSummary> {
    let mut state = WatchState::new();
    let options = IngestOptions {
        dry_run: config.dry_run,
    };

    // Graceful shutdown flag
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop_flag = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            stop_flag.store(true, Ordering::Relaxed);
        })
        .ok(); // Non-fatal if handler cannot be installed
    }

    tracing::info!(
        "Watching {} folder every {:?} (log: {})",
        source.name(),
        config.interval,
        log.name()
    );

    loop {
        match run_ingestion(source, log, notifier, options) {
            Ok(report) => {
                state.record_run(&report);
                emit(sinks, |s| s.on_run(&report));
            }
            Err(e) => {
                state.record_error();
                let err = anyhow::Error::new(e);
                tracing::error!("Run {} failed: {err:#}", state.run_count);
                emit(sinks, |s| s.on_run_error(&err));
            }
        }

        if config.status_every > 0 && state.run_count % config.status_every == 0 {
            let summary = state.summary();
            emit(sinks, |s| s.on_status(&summary));
        }

        if config.max_runs.is_some_and(|max| state.run_count >= max) {
            tracing::info!("Reached {} run(s), exiting", state.run_count);
            break;
        }

        if sleep_until_next_run(config.interval, &stop) {
            tracing::info!("Shutting down gracefully...");
            break;
        }
    }

    let summary = state.summary();
    emit(sinks, |s| s.on_status(&summary));
    Ok(summary)
}

/// Sleep for `interval`, waking early if the stop flag is raised.
///
/// Returns `true` when the loop should stop. An interval too long to add
/// to the current instant never elapses.
fn sleep_until_next_run(interval: Duration, stop: &AtomicBool) -> bool {
    let deadline = Instant::now().checked_add(interval);
    loop {
        if stop.load(Ordering::Relaxed) {
            return true;
        }
        let remaining = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return false;
                }
                deadline - now
            }
            None => SLEEP_SLICE,
        };
        std::thread::sleep(remaining.min(SLEEP_SLICE));
    }
}
