//! Unified error types for intake-relay.
//!
//! Notification failures are not errors here: they are carried as
//! [`NotifyOutcome::Failed`](crate::notify::NotifyOutcome) values so the
//! ingestion loop can skip the file and keep going. Everything in this
//! module aborts the current run.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for intake-relay operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RelayError {
    /// Errors while listing the source folder
    #[error("Folder listing failed: {context}")]
    Source {
        context: String,
        #[source]
        source: SourceErrorKind,
    },

    /// Errors while reading or appending to the log store
    #[error("Log store access failed: {context}")]
    LogStore {
        context: String,
        #[source]
        source: LogStoreErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific folder listing error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SourceErrorKind {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Folder not readable: {0}")]
    Unreadable(String),
}

/// Specific log store error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LogStoreErrorKind {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Malformed log row at line {line}: {message}")]
    MalformedRow { line: usize, message: String },
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for intake-relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl RelayError {
    /// Create a folder listing error with context
    pub fn source(context: impl Into<String>, source: SourceErrorKind) -> Self {
        Self::Source {
            context: context.into(),
            source,
        }
    }

    /// Create a log store error with context
    pub fn log_store(context: impl Into<String>, source: LogStoreErrorKind) -> Self {
        Self::LogStore {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The new context is prepended to whatever the error already carries, so
/// a failure deep in a backend reads as `outer: inner: cause`.
///
/// ```ignore
/// use intake_relay::error::ErrorContext;
///
/// let ids = store.known_ids().context("loading known file ids")?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<RelayError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: RelayError, new_ctx: &str) -> RelayError {
    match err {
        RelayError::Source {
            context: existing,
            source,
        } => RelayError::Source {
            context: chain_context(new_ctx, &existing),
            source,
        },
        RelayError::LogStore {
            context: existing,
            source,
        } => RelayError::LogStore {
            context: chain_context(new_ctx, &existing),
            source,
        },
        RelayError::Io {
            path,
            message,
            source,
        } => RelayError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        RelayError::Config(msg) => RelayError::Config(chain_context(new_ctx, &msg)),
        RelayError::Validation(msg) => RelayError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
