//! Watch state management.
//!
//! Tracks aggregate statistics for the watch session and which files keep
//! failing to notify across passes. Nothing here is persisted; the log
//! store stays the only source of truth for what has been processed.

use crate::ingest::IngestReport;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Instant;

/// Top-level state for an active watch session.
#[derive(Debug)]
pub(crate) struct WatchState {
    /// When the watch session started.
    pub started_at: Instant,
    /// Total number of passes attempted.
    pub run_count: u64,
    /// Passes that aborted with an error.
    pub failed_runs: u64,
    /// Records appended across all passes.
    pub total_logged: u64,
    /// Files whose most recent notification failed, keyed by file ID.
    pub failing: IndexMap<String, FailureStreak>,
}

/// Consecutive notification failures for one file.
#[derive(Debug, Clone)]
pub(crate) struct FailureStreak {
    pub name: String,
    pub attempts: u32,
    pub last_cause: String,
}

impl WatchState {
    pub(crate) fn new() -> Self {
        Self {
            started_at: Instant::now(),
            run_count: 0,
            failed_runs: 0,
            total_logged: 0,
            failing: IndexMap::new(),
        }
    }

    /// Fold a completed pass into the session counters.
    pub(crate) fn record_run(&mut self, report: &IngestReport) {
        self.run_count += 1;
        self.total_logged += report.logged.len() as u64;

        for record in &report.logged {
            if let Some(streak) = self.failing.shift_remove(&record.file_id) {
                tracing::info!(
                    "{} logged after {} failed attempt(s)",
                    record.file_id,
                    streak.attempts
                );
            }
        }

        for failed in &report.failed {
            let streak = self
                .failing
                .entry(failed.file_id.clone())
                .or_insert_with(|| FailureStreak {
                    name: failed.name.clone(),
                    attempts: 0,
                    last_cause: String::new(),
                });
            streak.attempts += 1;
            streak.last_cause.clone_from(&failed.cause);
            if streak.attempts > 1 {
                tracing::warn!(
                    "{} ({}) has failed {} consecutive run(s): {}",
                    streak.name,
                    failed.file_id,
                    streak.attempts,
                    streak.last_cause
                );
            }
        }

        // A file still in the folder and still unlogged fails again on every
        // completed pass, so anything absent from this report's failures was
        // removed from the folder (or logged by someone else).
        let still_failing: HashSet<&str> =
            report.failed.iter().map(|f| f.file_id.as_str()).collect();
        self.failing.retain(|id, streak| {
            let keep = still_failing.contains(id.as_str());
            if !keep {
                tracing::debug!("{} ({id}) no longer pending, dropping failure streak", streak.name);
            }
            keep
        });
    }

    /// Count a pass that aborted before producing a report.
    pub(crate) fn record_error(&mut self) {
        self.run_count += 1;
        self.failed_runs += 1;
    }

    pub(crate) fn summary(&self) -> WatchSummary {
        WatchSummary {
            run_count: self.run_count,
            total_logged: self.total_logged,
            failed_runs: self.failed_runs,
            still_failing: self.failing.len(),
            uptime_secs: self.started_at.elapsed().as_secs(),
        }
    }
}

/// Serializable summary of a watch session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchSummary {
    pub run_count: u64,
    pub total_logged: u64,
    pub failed_runs: u64,
    pub still_failing: usize,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::FailedFile;
    use crate::model::{CandidateFile, LoggedFileRecord, ParsedName};

    fn failed(id: &str) -> FailedFile {
        FailedFile {
            file_id: id.to_string(),
            name: format!("{id}.pdf"),
            cause: "timeout".to_string(),
        }
    }

    fn logged(id: &str) -> LoggedFileRecord {
        let file = CandidateFile::new(id, format!("{id}.pdf"));
        let parsed = ParsedName::from_file_name(&file.name);
        LoggedFileRecord::new(&file, parsed, chrono::Utc::now())
    }

    #[test]
    fn test_failure_streak_grows_then_clears() {
        let mut state = WatchState::new();

        let mut first = IngestReport::new(false);
        first.failed.push(failed("U1"));
        state.record_run(&first);
        state.record_run(&first);
        assert_eq!(state.failing["U1"].attempts, 2);

        let mut third = IngestReport::new(false);
        third.logged.push(logged("U1"));
        state.record_run(&third);
        assert!(state.failing.is_empty());

        let summary = state.summary();
        assert_eq!(summary.run_count, 3);
        assert_eq!(summary.total_logged, 1);
        assert_eq!(summary.still_failing, 0);
    }

    #[test]
    fn test_streak_dropped_when_file_leaves_folder() {
        let mut state = WatchState::new();

        let mut first = IngestReport::new(false);
        first.failed.push(failed("U1"));
        first.failed.push(failed("U2"));
        state.record_run(&first);
        assert_eq!(state.summary().still_failing, 2);

        // U1 was deleted from the folder, U2 keeps failing
        let mut second = IngestReport::new(false);
        second.failed.push(failed("U2"));
        state.record_run(&second);
        assert!(!state.failing.contains_key("U1"));
        assert_eq!(state.failing["U2"].attempts, 2);

        state.record_run(&IngestReport::new(false));
        assert_eq!(state.summary().still_failing, 0);
    }

    #[test]
    fn test_aborted_run_keeps_streaks() {
        let mut state = WatchState::new();
        let mut first = IngestReport::new(false);
        first.failed.push(failed("U1"));
        state.record_run(&first);
        state.record_error();
        assert_eq!(state.failing["U1"].attempts, 1);
    }

    #[test]
    fn test_record_error_counts_run() {
        let mut state = WatchState::new();
        state.record_error();
        let summary = state.summary();
        assert_eq!(summary.run_count, 1);
        assert_eq!(summary.failed_runs, 1);
    }
}
