// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for tracker HTTP calls.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTPS requests for production
//! - Mock transports for unit testing

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;

use crate::config::TrackerCredentials;

const USER_AGENT: &str = concat!("bugtally/", env!("CARGO_PKG_VERSION"));

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP client could not be built.
    #[error("client setup failed: {0}")]
    Setup(String),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The response body could not be read.
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Status code and decoded body of a tracker response.
///
/// Bodies that are not JSON (proxy error pages) are kept as a JSON string.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

impl TransportResponse {
    pub fn new(status: u16, body: Value) -> Self {
        TransportResponse { status, body }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport trait for tracker requests.
///
/// This trait abstracts over the actual HTTP client, allowing
/// for easy testing with mock implementations.
pub trait Transport: Send + Sync {
    /// Issue a GET for `path`, relative to the tracker base URL.
    fn get<'a>(
        &'a self,
        path: &'a str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<TransportResponse>> + Send + 'a>>;

    /// Issue a POST with a JSON body.
    fn post<'a>(
        &'a self,
        path: &'a str,
        body: Value,
    ) -> Pin<Box<dyn Future<Output = TransportResult<TransportResponse>> + Send + 'a>>;
}

/// HTTPS transport using reqwest with Basic auth.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    email: String,
    api_token: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for `base_url` authenticating as `credentials`.
    pub fn new(
        base_url: &str,
        credentials: &TrackerCredentials,
        timeout: Duration,
    ) -> TransportResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("X-Atlassian-Token", HeaderValue::from_static("no-check"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;

        Ok(HttpTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            email: credentials.email.clone(),
            api_token: credentials.api_token.clone(),
            timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> TransportResult<TransportResponse> {
        let response = request
            .basic_auth(&self.email, Some(&self.api_token))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(self.timeout)
                } else {
                    TransportError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::InvalidBody(e.to_string()))?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        tracing::trace!(status, "tracker response");
        Ok(TransportResponse { status, body })
    }
}

impl Transport for HttpTransport {
    fn get<'a>(
        &'a self,
        path: &'a str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<TransportResponse>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.url(path);
            tracing::debug!(method = "GET", url = %url, "tracker request");
            self.send(self.client.get(&url)).await
        })
    }

    fn post<'a>(
        &'a self,
        path: &'a str,
        body: Value,
    ) -> Pin<Box<dyn Future<Output = TransportResult<TransportResponse>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.url(path);
            tracing::debug!(method = "POST", url = %url, "tracker request");
            self.send(self.client.post(&url).json(&body)).await
        })
    }
}
