//! Notification of new files to the external processing endpoint.
//!
//! A notification never returns `Err`: the call either delivered or failed,
//! and the ingestion loop decides from [`NotifyOutcome`] alone whether to
//! log the file.

mod http;

pub use http::HttpNotifier;

use serde::Serialize;

/// Result of one notification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NotifyOutcome {
    /// The endpoint answered
    Delivered {
        /// HTTP status code
        status: u16,
        /// Response body, verbatim
        body: String,
    },
    /// The call could not be completed
    Failed {
        /// Human-readable cause
        cause: String,
    },
}

impl NotifyOutcome {
    /// Whether the file should be recorded in the log.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// One-line description used in log messages and failure reports.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Delivered { status, body } => format!("({status}) {body}"),
            Self::Failed { cause } => cause.clone(),
        }
    }
}

/// Trait for notification backends.
pub trait Notifier {
    /// Notify the endpoint that `file_id` was uploaded. Called once per file.
    fn notify(&self, file_id: &str) -> NotifyOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_log() {
        let ok = NotifyOutcome::Delivered {
            status: 200,
            body: "done".to_string(),
        };
        let failed = NotifyOutcome::Failed {
            cause: "connection refused".to_string(),
        };
        assert!(ok.should_log());
        assert!(!failed.should_log());
    }

    #[test]
    fn test_describe() {
        let ok = NotifyOutcome::Delivered {
            status: 202,
            body: "queued".to_string(),
        };
        let failed = NotifyOutcome::Failed {
            cause: "timed out".to_string(),
        };
        assert_eq!(ok.describe(), "(202) queued");
        assert_eq!(failed.describe(), "timed out");
    }

    #[test]
    fn test_outcome_json() {
        let failed = NotifyOutcome::Failed {
            cause: "timeout".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({"outcome": "failed", "cause": "timeout"})
        );
    }
}
