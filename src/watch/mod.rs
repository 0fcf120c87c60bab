//! Watch mode: repeat ingestion runs on an interval.
//!
//! Each pass is a complete, independent run; nothing carries over between
//! passes except in-memory counters used for status output.

pub(crate) mod config;
pub(crate) mod loop_impl;
pub(crate) mod state;

pub use config::{parse_duration, WatchConfig};
pub use loop_impl::run_watch_loop;
pub use state::WatchSummary;

/// Errors specific to the watch subsystem.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WatchError {
    #[error("invalid interval '{0}': expected format like 30s, 5m, 1h")]
    InvalidInterval(String),
}
