//! Watch configuration and duration parsing.

use super::WatchError;
use std::time::Duration;

/// Configuration for the watch command.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Pause between the end of one run and the start of the next
    pub interval: Duration,
    /// Stop after this many runs (unbounded when `None`)
    pub max_runs: Option<u64>,
    /// Emit a status summary every this many runs (0 disables)
    pub status_every: u64,
    /// Report new files without notifying or logging them
    pub dry_run: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            max_runs: None,
            status_every: 12,
            dry_run: false,
        }
    }
}

/// Parse an interval such as `30s` or `5m` into a [`Duration`].
///
/// Accepted units are `ms`, `s`, `m`, `h` and `d`. Values too large to
/// represent are rejected rather than wrapped.
pub fn parse_duration(s: &str) -> Result<Duration, WatchError> {
    let text = s.trim();
    let invalid = || WatchError::InvalidInterval(text.to_string());

    let (digits, secs_per_unit) = if let Some(ms) = text.strip_suffix("ms") {
        let value: u64 = ms.parse().map_err(|_| invalid())?;
        return Ok(Duration::from_millis(value));
    } else if let Some(n) = text.strip_suffix('s') {
        (n, 1)
    } else if let Some(n) = text.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = text.strip_suffix('h') {
        (n, 3_600)
    } else if let Some(n) = text.strip_suffix('d') {
        (n, 86_400)
    } else {
        return Err(invalid());
    };

    let value: u64 = digits.parse().map_err(|_| invalid())?;
    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}
