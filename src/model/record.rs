//! Candidate files, logged records and the known-identifier set.

use super::filename::ParsedName;
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A file found in the source folder during one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFile {
    /// Provider-assigned file identifier
    pub id: String,
    /// File name as listed by the provider
    pub name: String,
}

impl CandidateFile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One row of the relay log.
///
/// Rows are only ever appended; nothing here updates or removes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedFileRecord {
    /// Numeric index parsed from the file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    /// Provider-assigned file identifier
    pub file_id: String,
    /// File name with any `.pdf` suffix removed
    pub clean_name: String,
    /// When the row was written
    pub logged_at: DateTime<Utc>,
}

impl LoggedFileRecord {
    /// Build the record for a file that was just relayed.
    #[must_use]
    pub fn new(file: &CandidateFile, parsed: ParsedName, logged_at: DateTime<Utc>) -> Self {
        Self {
            index: parsed.index,
            file_id: file.id.clone(),
            clean_name: parsed.clean_name,
            logged_at,
        }
    }

    /// The four ordered row fields: index, file id, clean name, timestamp.
    ///
    /// A missing index is written as an empty cell.
    #[must_use]
    pub fn to_row(&self) -> [String; 4] {
        [
            self.index.clone().unwrap_or_default(),
            self.file_id.clone(),
            self.clean_name.clone(),
            self.logged_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        ]
    }
}

/// File identifiers already present in the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownIds {
    ids: IndexSet<String>,
}

impl KnownIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a flattened identifier column. Blank cells are ignored.
    pub fn from_column<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = cells
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        Self { ids }
    }

    #[must_use]
    pub fn contains(&self, file_id: &str) -> bool {
        self.ids.contains(file_id)
    }

    pub fn insert(&mut self, file_id: impl Into<String>) -> bool {
        self.ids.insert(file_id.into())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
