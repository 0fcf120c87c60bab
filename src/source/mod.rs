//! Folder sources: where candidate files are listed from.
//!
//! A source returns every file currently in the folder, already logged or
//! not; deduplication happens in the ingestion loop.

mod drive;
mod local;

pub use drive::{DriveFolder, DriveFolderConfig};
pub use local::LocalFolder;

use crate::config::{RelayConfig, SourceKind};
use crate::error::{RelayError, Result};
use crate::model::CandidateFile;

/// Trait for folder listing backends.
pub trait FolderSource {
    /// List every file currently in the folder, in provider order.
    ///
    /// Errors abort the run.
    fn list_files(&self) -> Result<Vec<CandidateFile>>;

    /// Short backend name for diagnostics (e.g. "drive").
    fn name(&self) -> &'static str;
}

/// Build the folder source selected by the configuration.
pub fn build_source(config: &RelayConfig) -> Result<Box<dyn FolderSource>> {
    match config.source.kind {
        SourceKind::Drive => {
            let token = config
                .google
                .access_token
                .clone()
                .ok_or_else(|| RelayError::config("Drive source requires google.access_token"))?;
            Ok(Box::new(DriveFolder::new(DriveFolderConfig {
                folder_id: config.source.folder.clone(),
                api_base: config.source.drive_api_base.clone(),
                access_token: token,
                pdf_only: config.source.pdf_only,
            })))
        }
        SourceKind::Local => Ok(Box::new(LocalFolder::new(
            &config.source.folder,
            config.source.pdf_only,
        ))),
    }
}
