//! Filename parsing: numeric index prefix and display name cleanup.
//!
//! Both functions are best-effort. A name such as `"167. David Kim.pdf"`
//! yields index `"167"` and clean name `"167. David Kim"`; a name with no
//! `<digits>.` prefix simply has no index.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static INDEX_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\.\s*").expect("static regex"));

static PDF_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.pdf$").expect("static regex"));

/// Extract the leading `<digits>.` index from a file name.
///
/// Only ASCII digits count. Whitespace after the period is optional, so
/// `"42.Report.PDF"` still yields `"42"`. The name is matched as-is,
/// without trimming.
#[must_use]
pub fn extract_index(file_name: &str) -> Option<String> {
    INDEX_PREFIX
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Strip one trailing `.pdf` suffix, case-insensitively.
#[must_use]
pub fn clean_name(file_name: &str) -> String {
    PDF_SUFFIX.replace(file_name, "").into_owned()
}

/// Index and display name derived from a file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedName {
    /// Leading numeric index, if the name had one
    pub index: Option<String>,
    /// Name with a trailing `.pdf` removed
    pub clean_name: String,
}

impl ParsedName {
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Self {
        Self {
            index: extract_index(file_name),
            clean_name: clean_name(file_name),
        }
    }
}
