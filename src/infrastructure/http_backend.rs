//! HTTP client for the quote backend.
//!
//! Talks to `/api/save-to-sounds` and `/api/download-batch`. No retries and
//! no request timeout: a call waits until the backend answers.

use reqwest::{Client, Response};
use serde::Serialize;

use crate::application::QuoteBackend;
use crate::domain::{
    AppError, BackendConfig, DownloadRequest, ErrorBody, Result, SaveRequest, SaveResponse,
};

const SAVE_PATH: &str = "/api/save-to-sounds";
const DOWNLOAD_PATH: &str = "/api/download-batch";

/// `reqwest`-backed implementation of [`QuoteBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    /// Build a client for the configured backend.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(config: BackendConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }

        let client = builder.build().map_err(AppError::network)?;
        Ok(Self { client, config })
    }

    /// Origin requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

impl HttpBackend {
    /// POST `request` as JSON to `path`, failing on a non-2xx status.
    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        request: &T,
        fallback: &str,
    ) -> Result<Response> {
        let url = self.config.endpoint(path);
        tracing::debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(AppError::network)?;

        ensure_success(response, fallback).await
    }
}

impl QuoteBackend for HttpBackend {
    async fn save_to_sounds(&self, request: &SaveRequest) -> Result<SaveResponse> {
        let response = self.post_json(SAVE_PATH, request, "Save failed").await?;
        let body = response.bytes().await.map_err(AppError::network)?;

        serde_json::from_slice(&body).map_err(AppError::json_parse)
    }

    async fn download_batch(&self, request: &DownloadRequest) -> Result<Vec<u8>> {
        let response = self
            .post_json(DOWNLOAD_PATH, request, "Batch download failed")
            .await?;
        let bytes = response.bytes().await.map_err(AppError::network)?;

        tracing::debug!(size = bytes.len(), "Received batch archive");
        Ok(bytes.to_vec())
    }
}

/// Turn a non-2xx response into a `Server` error.
async fn ensure_success(response: Response, fallback: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    Err(server_error(status.as_u16(), &body, fallback))
}

/// Build a `Server` error, using the backend's `{ "error": ... }` text if present.
fn server_error(status: u16, body: &[u8], fallback: &str) -> AppError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string());

    tracing::warn!(status, %message, "Backend returned an error");
    AppError::Server { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_uses_body_message() {
        let err = server_error(400, br#"{"error": "No quotes provided"}"#, "Save failed");
        match err {
            AppError::Server { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "No quotes provided");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_server_error_falls_back() {
        let bodies: [&[u8]; 3] = [b"<html>502</html>", br#"{"error": ""}"#, b""];
        for body in bodies {
            let err = server_error(502, body, "Save failed");
            assert!(matches!(err, AppError::Server { message, .. } if message == "Save failed"));
        }
    }

    #[test]
    fn test_new_keeps_base_url() {
        let backend = HttpBackend::new(BackendConfig {
            base_url: "http://127.0.0.1:9".into(),
            connect_timeout_secs: 1,
        })
        .unwrap();
        assert_eq!(backend.base_url(), "http://127.0.0.1:9");
    }

    /// Answer a single HTTP request with `status` and `body`, then close.
    fn serve_once(status: &'static str, body: &'static str) -> String {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_lowercase();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{addr}")
    }

    fn backend(base_url: String) -> HttpBackend {
        HttpBackend::new(BackendConfig {
            base_url,
            connect_timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_both_endpoints_report_backend_errors_alike() {
        let body = r#"{"error": "No quotes provided"}"#;

        let save = backend(serve_once("400 Bad Request", body))
            .save_to_sounds(&SaveRequest {
                quotes: Vec::new(),
                folder: crate::domain::SoundFolder::Done,
            })
            .await
            .unwrap_err();
        let download = backend(serve_once("400 Bad Request", body))
            .download_batch(&DownloadRequest { quotes: Vec::new() })
            .await
            .unwrap_err();

        for err in [save, download] {
            match err {
                AppError::Server { status, message } => {
                    assert_eq!(status, 400);
                    assert_eq!(message, "No quotes provided");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[tokio::test]
    async fn test_download_error_without_body_uses_fallback() {
        let err = backend(serve_once("500 Internal Server Error", ""))
            .download_batch(&DownloadRequest { quotes: Vec::new() })
            .await
            .unwrap_err();
        match err {
            AppError::Server { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Batch download failed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_save_parses_success_body() {
        let body = r#"{"saved": 2, "targetDir": "/sounds/done", "skipped": 1}"#;
        let response = backend(serve_once("200 OK", body))
            .save_to_sounds(&SaveRequest {
                quotes: Vec::new(),
                folder: crate::domain::SoundFolder::Done,
            })
            .await
            .unwrap();
        assert_eq!(response.saved, 2);
        assert_eq!(response.target_dir, "/sounds/done");
        assert_eq!(response.deleted, 0);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Port 9 (discard) is closed on test machines.
        let backend = HttpBackend::new(BackendConfig {
            base_url: "http://127.0.0.1:9".into(),
            connect_timeout_secs: 1,
        })
        .unwrap();

        let err = backend
            .download_batch(&DownloadRequest { quotes: Vec::new() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Network { .. }));
    }
}
