//! Shared HTTP client instance.
//!
//! # Responsibilities
//! - Hold the base URL and request timeout for one application
//! - Issue GET and POST requests relative to the base URL
//! - Surface transport, timeout and status failures to the caller
//!
//! # Design Decisions
//! - Immutable after construction; share it behind an `Arc`
//! - Paths are appended to the base URL verbatim
//! - No retries: every failure propagates
//! - Non-2xx statuses are errors

use std::path::Path;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::error::ApiError;
use crate::config::ApiConfig;

/// Form field name used for file uploads.
pub const UPLOAD_FIELD: &str = "file";

/// Request body for `post`.
#[derive(Debug, Clone)]
pub enum Payload {
    /// JSON document.
    Json(serde_json::Value),
    /// Single file sent as `multipart/form-data`.
    File(FilePart),
}

/// A file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its content type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self, ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = guess_content_type(&file_name).to_string();
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    let ext = file_name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// A fully read response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP client bound to a base URL and timeout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Create a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Url::parse(base_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Transport)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, Duration::from_millis(config.timeout_ms))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET {base}{path}`.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        tracing::debug!(path = %path, "GET");
        let request = self.http.get(self.url(path));
        self.send(request).await
    }

    /// `POST {base}{path}` with `body`.
    pub async fn post(&self, path: &str, body: Payload) -> Result<ApiResponse, ApiError> {
        tracing::debug!(path = %path, "POST");
        let request = self.http.post(self.url(path));
        let request = match body {
            Payload::Json(value) => request.json(&value),
            Payload::File(file) => {
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(ApiError::Transport)?;
                request.multipart(Form::new().part(UPLOAD_FIELD, part))
            }
        };
        self.send(request).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<ApiResponse, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, self.timeout))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_transport(e, self.timeout))?
            .to_vec();

        if !status.is_success() {
            tracing::debug!(status = %status, "API request failed");
            return Err(ApiError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_concatenated() {
        let client = ApiClient::new("http://localhost:3000/api/", Duration::from_secs(10)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.url("/blogs/7"), "http://localhost:3000/api/blogs/7");
    }

    #[test]
    fn rejects_bad_base_url() {
        let err = ApiClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
    }

    #[test]
    fn config_timeout_is_applied() {
        let client = ApiClient::from_config(&ApiConfig::default()).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn content_type_guess() {
        assert_eq!(guess_content_type("cat.PNG"), "image/png");
        assert_eq!(guess_content_type("a.jpeg"), "image/jpeg");
        assert_eq!(guess_content_type("notes"), "application/octet-stream");
    }
}
