//! Google Sheets log store (Sheets API v4 `values.get` / `values.append`).

use super::LogStore;
use crate::error::{LogStoreErrorKind, RelayError, Result};
use crate::model::{KnownIds, LoggedFileRecord};
use reqwest::Url;
use serde::Deserialize;
use std::borrow::Cow;

/// Sheets log configuration
#[derive(Debug, Clone)]
pub struct SheetsLogConfig {
    pub spreadsheet_id: String,
    /// Tab holding the log rows
    pub sheet_name: String,
    /// Column letter holding file IDs
    pub id_column: String,
    /// API base URL, e.g. `https://sheets.googleapis.com/v4`
    pub api_base: String,
    /// Pre-provisioned OAuth2 bearer token
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Log store backed by one sheet of a spreadsheet.
pub struct SheetsLog {
    config: SheetsLogConfig,
    client: reqwest::blocking::Client,
}

impl SheetsLog {
    #[must_use]
    pub fn new(config: SheetsLogConfig) -> Self {
        Self {
            config,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// A1 range of the whole identifier column, e.g. `Log!B:B`.
    fn id_range(&self) -> String {
        format!(
            "{}!{col}:{col}",
            a1_sheet_name(&self.config.sheet_name),
            col = self.config.id_column
        )
    }

    /// A1 anchor for appends; Sheets finds the end of the table itself.
    fn append_range(&self) -> String {
        format!("{}!A1", a1_sheet_name(&self.config.sheet_name))
    }

    /// `{base}/spreadsheets/{id}/values/{last_segment}`
    fn values_url(&self, last_segment: &str) -> Result<Url> {
        let invalid = |msg: String| {
            RelayError::log_store(
                "building Sheets URL",
                LogStoreErrorKind::InvalidResponse(msg),
            )
        };
        let mut url = Url::parse(&self.config.api_base)
            .map_err(|e| invalid(format!("{}: {e}", self.config.api_base)))?;
        url.path_segments_mut()
            .map_err(|()| invalid(format!("{} cannot be a base URL", self.config.api_base)))?
            .pop_if_empty()
            .push("spreadsheets")
            .push(&self.config.spreadsheet_id)
            .push("values")
            .push(last_segment);
        Ok(url)
    }

    fn check_status(
        response: reqwest::blocking::Response,
        context: &str,
    ) -> Result<reqwest::blocking::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(RelayError::log_store(
            context,
            LogStoreErrorKind::Status {
                status: status.as_u16(),
                body,
            },
        ))
    }
}

/// Flatten a column read into scalar cell strings.
fn flatten_column(range: ValueRange) -> Vec<String> {
    range
        .values
        .into_iter()
        .flatten()
        .map(|cell| match cell {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect()
}

impl LogStore for SheetsLog {
    fn known_ids(&self) -> Result<KnownIds> {
        let range = self.id_range();
        let context = format!("reading {range} of spreadsheet {}", self.config.spreadsheet_id);
        let url = self.values_url(&range)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.access_token)
            .send()
            .map_err(|e| RelayError::log_store(&context, LogStoreErrorKind::Http(e.to_string())))?;
        let response = Self::check_status(response, &context)?;

        let values: ValueRange = response.json().map_err(|e| {
            RelayError::log_store(&context, LogStoreErrorKind::InvalidResponse(e.to_string()))
        })?;
        Ok(KnownIds::from_column(flatten_column(values)))
    }

    fn append(&mut self, record: &LoggedFileRecord) -> Result<()> {
        let context = format!(
            "appending {} to spreadsheet {}",
            record.file_id, self.config.spreadsheet_id
        );
        let url = self.values_url(&format!("{}:append", self.append_range()))?;
        let body = serde_json::json!({ "values": [record.to_row()] });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.access_token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body)
            .send()
            .map_err(|e| RelayError::log_store(&context, LogStoreErrorKind::Http(e.to_string())))?;
        Self::check_status(response, &context)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sheets"
    }
}

/// Sheet name as it must appear in A1 notation.
///
/// Names made only of ASCII letters, digits and underscores are used as-is;
/// anything else is wrapped in single quotes with embedded quotes doubled.
fn a1_sheet_name(name: &str) -> Cow<'_, str> {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("'{}'", name.replace('\'', "''")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(api_base: &str) -> SheetsLog {
        SheetsLog::new(SheetsLogConfig {
            spreadsheet_id: "sheet-1".to_string(),
            sheet_name: "Log".to_string(),
            id_column: "B".to_string(),
            api_base: api_base.to_string(),
            access_token: "token".to_string(),
        })
    }

    #[test]
    fn test_ranges() {
        let log = log("https://sheets.googleapis.com/v4");
        assert_eq!(log.id_range(), "Log!B:B");
        assert_eq!(log.append_range(), "Log!A1");
    }

    #[test]
    fn test_values_url() {
        let log = log("https://sheets.googleapis.com/v4/");
        let url = log.values_url("Log!A1:append").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-1/values/Log!A1:append"
        );
    }

    #[test]
    fn test_ranges_quote_sheet_names() {
        let mut log = log("https://sheets.googleapis.com/v4");
        log.config.sheet_name = "Upload Log".to_string();
        assert_eq!(log.id_range(), "'Upload Log'!B:B");
        assert_eq!(log.append_range(), "'Upload Log'!A1");

        log.config.sheet_name = "Bob's Files".to_string();
        assert_eq!(log.append_range(), "'Bob''s Files'!A1");

        log.config.sheet_name = "Intake_2024".to_string();
        assert_eq!(log.id_range(), "Intake_2024!B:B");
    }

    #[test]
    fn test_values_url_escapes_sheet_names() {
        let mut log = log("https://sheets.googleapis.com/v4");
        log.config.sheet_name = "Upload Log".to_string();
        let url = log.values_url(&log.id_range()).unwrap();
        assert!(url.as_str().ends_with("/values/'Upload%20Log'!B:B"), "{url}");
    }

    #[test]
    fn test_flatten_column() {
        let range: ValueRange = serde_json::from_str(
            r#"{"range": "Log!B1:B4", "values": [["File ID"], ["F1"], [], [42]]}"#,
        )
        .unwrap();
        assert_eq!(flatten_column(range), vec!["File ID", "F1", "42"]);
    }

    #[test]
    fn test_empty_column_has_no_values_key() {
        let range: ValueRange = serde_json::from_str(r#"{"range": "Log!B:B"}"#).unwrap();
        assert!(flatten_column(range).is_empty());
    }
}
