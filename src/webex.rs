//! Webex Teams API client: attachment download and message posting
//!
//! One authenticated GET per attachment, one POST per reply. No retries —
//! every failure propagates so the invoking platform can apply its own
//! error policy.

use crate::config::Settings;
use bytes::Bytes;
use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Attachment fetch failure. No reply is sent when this occurs.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// The request could not be sent or the body could not be read.
    #[error("attachment request failed: {0}")]
    Network(String),
    /// The file endpoint answered with a non-success status
    /// (includes authorization rejection on an expired/invalid token).
    #[error("attachment fetch returned {0}")]
    Status(StatusCode),
    /// The attachment exceeds the configured size cap.
    #[error("attachment too large: {size} bytes (max {max})")]
    TooLarge {
        /// Reported or downloaded size in bytes.
        size: u64,
        /// Configured ceiling in bytes.
        max: u64,
    },
}

/// Reply delivery failure, surfaced to the invoking platform after the fact.
#[derive(Error, Debug)]
pub enum PostError {
    /// The request could not be sent.
    #[error("message post failed: {0}")]
    Network(String),
    /// The messages endpoint answered with a non-success status.
    #[error("message post returned {status}: {body}")]
    Status {
        /// HTTP status of the response.
        status: StatusCode,
        /// Response body, for correlation in logs.
        body: String,
    },
}

/// HTTP client for the Webex Teams REST API.
///
/// Holds immutable credentials and a shared connection pool; initialized
/// once per process lifetime and never mutated.
#[derive(Clone)]
pub struct WebexClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
    max_attachment_bytes: u64,
}

impl fmt::Debug for WebexClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebexClient")
            .field("api_base", &self.api_base)
            .field("token", &"[REDACTED]")
            .field("max_attachment_bytes", &self.max_attachment_bytes)
            .finish_non_exhaustive()
    }
}

impl WebexClient {
    /// Create a client with the configured timeout and credentials.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        let timeout = Duration::from_secs(settings.http_timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_base: settings.webex_api_base.clone(),
            token: settings.bot_token.clone(),
            max_attachment_bytes: settings.max_attachment_bytes,
        }
    }

    /// Download an attachment with bearer-token authorization.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] on network failure, non-2xx response, or
    /// when the attachment exceeds the configured size cap.
    pub async fn fetch_attachment(&self, url: &str) -> Result<Bytes, DownloadError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| DownloadError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DownloadError::Status(response.status()));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_attachment_bytes {
                return Err(DownloadError::TooLarge {
                    size: len,
                    max: self.max_attachment_bytes,
                });
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DownloadError::Network(e.to_string()))?;

        // Content-Length may be absent or lie; re-check the actual body.
        if bytes.len() as u64 > self.max_attachment_bytes {
            return Err(DownloadError::TooLarge {
                size: bytes.len() as u64,
                max: self.max_attachment_bytes,
            });
        }

        debug!(size = bytes.len(), "Attachment downloaded");
        Ok(bytes)
    }

    /// Post a text message into a room.
    ///
    /// No idempotency key is used — a retried POST duplicates the message.
    ///
    /// # Errors
    ///
    /// Returns [`PostError`] on network failure or non-2xx response.
    pub async fn post_message(&self, room_id: &str, text: &str) -> Result<(), PostError> {
        let url = format!("{}/messages", self.api_base);
        let body = serde_json::json!({ "roomId": room_id, "text": text });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| PostError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PostError::Status { status, body });
        }

        Ok(())
    }
}
