//! Google Drive folder listing (Drive API v3 `files.list`).

use super::FolderSource;
use crate::config::DRIVE_PAGE_SIZE;
use crate::error::{RelayError, Result, SourceErrorKind};
use crate::model::CandidateFile;
use serde::Deserialize;

/// Drive folder source configuration
#[derive(Debug, Clone)]
pub struct DriveFolderConfig {
    /// Folder whose direct children are listed
    pub folder_id: String,
    /// API base URL, e.g. `https://www.googleapis.com/drive/v3`
    pub api_base: String,
    /// Pre-provisioned OAuth2 bearer token
    pub access_token: String,
    /// Restrict the listing to `application/pdf`
    pub pdf_only: bool,
}

/// One page of a `files.list` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListPage {
    #[serde(default)]
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    name: String,
}

/// Lists a Drive folder, following `nextPageToken` until exhausted.
pub struct DriveFolder {
    config: DriveFolderConfig,
    client: reqwest::blocking::Client,
}

impl DriveFolder {
    #[must_use]
    pub fn new(config: DriveFolderConfig) -> Self {
        Self {
            config,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Drive search query for the folder's children.
    fn query(&self) -> String {
        let mut q = format!(
            "'{}' in parents and trashed=false",
            self.config.folder_id.replace('\'', "\\'")
        );
        if self.config.pdf_only {
            q.push_str(" and mimeType='application/pdf'");
        }
        q
    }

    fn fetch_page(&self, page_token: Option<&str>) -> Result<FileListPage> {
        let url = format!("{}/files", self.config.api_base.trim_end_matches('/'));
        let page_size = DRIVE_PAGE_SIZE.to_string();
        let q = self.query();
        let mut params = vec![
            ("q", q.as_str()),
            ("fields", "nextPageToken, files(id, name)"),
            ("pageSize", page_size.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let context = || format!("listing Drive folder {}", self.config.folder_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.access_token)
            .query(&params)
            .send()
            .map_err(|e| RelayError::source(context(), SourceErrorKind::Http(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RelayError::source(
                context(),
                SourceErrorKind::Status {
                    status: status.as_u16(),
                    body,
                },
            ));
        }

        response.json::<FileListPage>().map_err(|e| {
            RelayError::source(context(), SourceErrorKind::InvalidResponse(e.to_string()))
        })
    }
}

impl FolderSource for DriveFolder {
    fn list_files(&self) -> Result<Vec<CandidateFile>> {
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(page_token.as_deref())?;
            pages += 1;
            tracing::debug!("Drive page {pages}: {} file(s)", page.files.len());

            files.extend(
                page.files
                    .into_iter()
                    .map(|f| CandidateFile::new(f.id, f.name)),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(files)
    }

    fn name(&self) -> &'static str {
        "drive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(pdf_only: bool) -> DriveFolder {
        DriveFolder::new(DriveFolderConfig {
            folder_id: "abc123".to_string(),
            api_base: "http://127.0.0.1:1".to_string(),
            access_token: "token".to_string(),
            pdf_only,
        })
    }

    #[test]
    fn test_query_all_files() {
        assert_eq!(folder(false).query(), "'abc123' in parents and trashed=false");
    }

    #[test]
    fn test_query_pdf_only() {
        assert_eq!(
            folder(true).query(),
            "'abc123' in parents and trashed=false and mimeType='application/pdf'"
        );
    }

    #[test]
    fn test_page_deserialize() {
        let json = r#"{
            "nextPageToken": "p2",
            "files": [{"id": "F1", "name": "167. David Kim.pdf"}]
        }"#;
        let page: FileListPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("p2"));
        assert_eq!(page.files.len(), 1);
        assert_eq!(page.files[0].id, "F1");
    }

    #[test]
    fn test_last_page_deserialize() {
        let page: FileListPage = serde_json::from_str(r#"{"files": []}"#).unwrap();
        assert!(page.next_page_token.is_none());
        assert!(page.files.is_empty());
    }

    #[test]
    fn test_unreachable_api_is_source_error() {
        let err = folder(false).list_files().unwrap_err();
        assert!(matches!(err, RelayError::Source { .. }), "got {err:?}");
    }
}
