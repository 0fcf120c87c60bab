//! HTTP notifier: POST `{"file_id": ...}` to the configured endpoint.

use super::{Notifier, NotifyOutcome};
use crate::config::NotifyConfig;
use crate::error::{RelayError, Result};
use std::time::Duration;

/// Posts one JSON notification per file, synchronously, without retry.
pub struct HttpNotifier {
    url: String,
    require_success_status: bool,
    client: reqwest::blocking::Client,
}

impl HttpNotifier {
    /// Create a notifier with the client's default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            require_success_status: false,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Create a notifier from config, applying the request timeout if set.
    pub fn from_config(config: &NotifyConfig) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| RelayError::config(format!("building notification client: {e}")))?;
        Ok(Self {
            url: config.url.clone(),
            require_success_status: config.require_success_status,
            client,
        })
    }

    /// Count non-2xx responses as failures instead of deliveries.
    #[must_use]
    pub const fn with_require_success_status(mut self, require: bool) -> Self {
        self.require_success_status = require;
        self
    }
}

impl Notifier for HttpNotifier {
    fn notify(&self, file_id: &str) -> NotifyOutcome {
        let payload = serde_json::json!({ "file_id": file_id });
        let response = match self.client.post(&self.url).json(&payload).send() {
            Ok(r) => r,
            Err(e) => {
                return NotifyOutcome::Failed {
                    cause: e.to_string(),
                }
            }
        };

        let status = response.status();
        let body = match response.text() {
            Ok(b) => b,
            Err(e) => {
                return NotifyOutcome::Failed {
                    cause: format!("reading response body: {e}"),
                }
            }
        };

        if !status.is_success() {
            if self.require_success_status {
                return NotifyOutcome::Failed {
                    cause: format!("endpoint returned status {status}: {body}"),
                };
            }
            tracing::warn!("Endpoint returned status {status} for {file_id}; counting as delivered");
        }

        NotifyOutcome::Delivered {
            status: status.as_u16(),
            body,
        }
    }
}
