//! Local directory listing.
//!
//! The file name doubles as the file ID, so renaming a file makes it new.

use super::FolderSource;
use crate::error::{RelayError, Result, SourceErrorKind};
use crate::model::CandidateFile;
use std::path::{Path, PathBuf};

/// Lists regular files directly inside a directory (non-recursive).
#[derive(Debug, Clone)]
pub struct LocalFolder {
    dir: PathBuf,
    pdf_only: bool,
}

impl LocalFolder {
    pub fn new(dir: impl AsRef<Path>, pdf_only: bool) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            pdf_only,
        }
    }

    fn is_pdf(name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
    }
}

impl FolderSource for LocalFolder {
    fn list_files(&self) -> Result<Vec<CandidateFile>> {
        let context = || format!("listing {}", self.dir.display());
        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            RelayError::source(context(), SourceErrorKind::Unreadable(e.to_string()))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                RelayError::source(context(), SourceErrorKind::Unreadable(e.to_string()))
            })?;
            if !entry.file_type().is_ok_and(|t| t.is_file()) {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!("Skipping non-UTF-8 file name in {}", self.dir.display());
                continue;
            };
            if self.pdf_only && !Self::is_pdf(&name) {
                continue;
            }
            files.push(CandidateFile::new(name.clone(), name));
        }

        // read_dir order is platform-defined; sort for stable runs
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
