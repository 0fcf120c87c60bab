//! **Relay newly uploaded folder files to a processing endpoint.**
//!
//! `intake-relay` watches a shared upload folder (a Google Drive folder or a
//! local directory), notifies an HTTP endpoint once for every file it has not
//! seen before, and appends a row to an append-only log (a Google Sheets
//! spreadsheet or a local NDJSON file) for every file the endpoint accepted.
//!
//! The log doubles as the deduplication state: a file is "new" exactly when
//! its identifier is missing from the log's identifier column. A failed
//! notification leaves the file unlogged, so it is tried again on the next
//! run.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: Candidate files, logged records and the filename parsing
//!   that derives an index and a clean display name.
//! - **[`source`]**: The [`FolderSource`] trait and its Drive and local
//!   backends.
//! - **[`log_store`]**: The [`LogStore`] trait and its Sheets and NDJSON
//!   backends.
//! - **[`notify`]**: The [`Notifier`] trait and the HTTP notifier.
//! - **[`ingest`]**: [`run_ingestion`], one complete pass over the folder.
//! - **[`watch`]**: Repeated passes on an interval.
//!
//! ## Getting Started
//!
//! ```no_run
//! use intake_relay::{run_ingestion, HttpNotifier, IngestOptions, LocalFolder, NdjsonLog};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = LocalFolder::new("inbox", true);
//!     let mut log = NdjsonLog::new("relay-log.ndjson");
//!     let notifier = HttpNotifier::new("http://localhost:8080/process");
//!
//!     let report = run_ingestion(&source, &mut log, &notifier, IngestOptions::default())?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod log_store;
pub mod model;
pub mod notify;
pub mod output;
pub mod source;
pub mod watch;

// Re-export main types for convenience
pub use config::{ConfigError, RelayConfig, RelayConfigBuilder, Validatable};
pub use error::{ErrorContext, RelayError, Result};
pub use ingest::{run_ingestion, IngestOptions, IngestReport};
pub use log_store::{LogStore, NdjsonLog, SheetsLog};
pub use model::{CandidateFile, KnownIds, LoggedFileRecord, ParsedName};
pub use notify::{HttpNotifier, Notifier, NotifyOutcome};
pub use source::{DriveFolder, FolderSource, LocalFolder};
