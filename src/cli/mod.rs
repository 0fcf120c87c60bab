//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler wires configuration into the collaborators for one subcommand.

mod run;
mod watch;

pub use run::{run_once, OutputOptions};
pub use watch::run_watch;

use crate::config::{RelayConfig, Validatable};
use crate::error::RelayError;

/// Reject an invalid configuration before any network or file access.
pub(crate) fn ensure_valid(config: &RelayConfig) -> anyhow::Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let joined = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(RelayError::validation(joined).into())
}
