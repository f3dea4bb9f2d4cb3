//! Thin blocking HTTP client for the analysis backend.

use crate::domain::{UPLOAD_FIELD_NAME, UploadedFile};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response, multipart};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API Error: {status}")]
    RequestFailed { status: StatusCode },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected response: missing {0}")]
    MissingField(&'static str),

    #[error("Request cancelled")]
    Cancelled,
}

/// JSON and multipart calls against a single base address.
///
/// One request per call: no retries and no timeout, so a hung backend
/// blocks the calling worker until the connection closes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// POSTs `body` as JSON and returns the parsed JSON response.
    pub fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Value, ApiError> {
        let url = self.url(endpoint);
        debug!(%url, "POST json");
        let response = self.client.post(&url).json(body).send()?;
        Self::parse(response)
    }

    /// Sends `file` as a multipart form under the `file` field.
    ///
    /// The content type header is left to reqwest so it carries the
    /// generated boundary.
    pub fn upload_file(&self, endpoint: &str, file: &UploadedFile) -> Result<Value, ApiError> {
        let url = self.url(endpoint);
        debug!(%url, file = %file.name, bytes = file.bytes.len(), "POST multipart");
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)?;
        let form = multipart::Form::new().part(UPLOAD_FIELD_NAME, part);
        let response = self.client.post(&url).multipart(form).send()?;
        Self::parse(response)
    }

    fn parse(response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            warn!(%status, url = %response.url(), "backend returned failure status");
            return Err(ApiError::RequestFailed { status });
        }
        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MIME_PDF;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    #[test]
    fn post_should_send_json_and_parse_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/agents/summarizer")
                .header("content-type", "application/json")
                .json_body(json!({ "content": "long text" }));
            then.status(200).json_body(json!({ "summary": "short" }));
        });

        let client = ApiClient::new(server.base_url()).unwrap();
        let response = client
            .post("/agents/summarizer", &json!({ "content": "long text" }))
            .expect("post should succeed");

        mock.assert();
        assert_eq!(response, json!({ "summary": "short" }));
    }

    #[test]
    fn post_should_join_base_url_with_single_slash() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/agents/summarizer");
            then.status(200).json_body(json!("ok"));
        });

        let client = ApiClient::new(format!("{}/", server.base_url())).unwrap();
        client.post("agents/summarizer", &json!({})).unwrap();
        mock.assert();
    }

    #[test]
    fn post_should_fail_on_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/agents/website-analyzer");
            then.status(500).body("boom");
        });

        let client = ApiClient::new(server.base_url()).unwrap();
        let err = client
            .post("/agents/website-analyzer", &json!({ "website_url": "https://x.org" }))
            .unwrap_err();

        assert!(matches!(err, ApiError::RequestFailed { status } if status.as_u16() == 500));
        assert_eq!(err.to_string(), "API Error: 500 Internal Server Error");
    }

    #[test]
    fn post_should_fail_on_non_json_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/agents/summarizer");
            then.status(200).body("<html>");
        });

        let client = ApiClient::new(server.base_url()).unwrap();
        let err = client.post("/agents/summarizer", &json!({})).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn post_should_surface_transport_errors() {
        let client = ApiClient::new("http://127.0.0.1:1").unwrap();
        let err = client.post("/agents/summarizer", &json!({})).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn upload_file_should_send_multipart_file_field() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/upload/resume")
                .body_contains("name=\"file\"")
                .body_contains("filename=\"resume.pdf\"")
                .body_contains("%PDF-1.4");
            then.status(200)
                .json_body(json!({ "resume_path": "/tmp/uploads/resume.pdf", "name": "resume.pdf" }));
        });

        let client = ApiClient::new(server.base_url()).unwrap();
        let file = UploadedFile::new("resume.pdf", MIME_PDF, b"%PDF-1.4".to_vec());
        let response = client.upload_file("/upload/resume", &file).unwrap();

        mock.assert();
        assert_eq!(response["resume_path"], "/tmp/uploads/resume.pdf");
    }
}
