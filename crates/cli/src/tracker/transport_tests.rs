// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the transport module.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::transport::{
    HttpTransport, Transport, TransportError, TransportResponse, TransportResult,
};
use crate::config::TrackerCredentials;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A request the mock received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// Mock transport for testing without a real tracker.
///
/// Responses are served in the order they were queued regardless of path.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<TransportResult<TransportResponse>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport::default()
    }

    /// Queue a response with the given status and body.
    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(TransportResponse::new(status, body)));
        self
    }

    /// Queue a transport-level failure.
    pub fn fail(&self, error: TransportError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Get all requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next(
        &self,
        method: &'static str,
        path: &str,
        body: Option<Value>,
    ) -> TransportResult<TransportResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_string(),
            body,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::RequestFailed("no response queued".into())))
    }
}

impl Transport for MockTransport {
    fn get<'a>(
        &'a self,
        path: &'a str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<TransportResponse>> + Send + 'a>> {
        let result = self.next("GET", path, None);
        Box::pin(async move { result })
    }

    fn post<'a>(
        &'a self,
        path: &'a str,
        body: Value,
    ) -> Pin<Box<dyn Future<Output = TransportResult<TransportResponse>> + Send + 'a>> {
        let result = self.next("POST", path, Some(body));
        Box::pin(async move { result })
    }
}

#[tokio::test]
async fn test_mock_serves_in_order_and_records() {
    let mock = MockTransport::new();
    mock.respond(200, json!({"n": 1})).respond(404, Value::Null);

    let first = mock.get("/a").await.unwrap();
    let second = mock.post("/b", json!({"x": true})).await.unwrap();

    assert_eq!(first.body, json!({"n": 1}));
    assert_eq!(second.status, 404);
    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[1].path, "/b");
    assert_eq!(requests[1].body, Some(json!({"x": true})));
}

#[tokio::test]
async fn test_mock_exhausted_is_error() {
    let mock = MockTransport::new();
    let result = mock.get("/nothing").await;
    assert!(matches!(result, Err(TransportError::RequestFailed(_))));
}

#[test]
fn test_response_is_success() {
    assert!(TransportResponse::new(200, Value::Null).is_success());
    assert!(TransportResponse::new(204, Value::Null).is_success());
    assert!(!TransportResponse::new(302, Value::Null).is_success());
    assert!(!TransportResponse::new(500, Value::Null).is_success());
}

#[test]
fn test_http_transport_builds() {
    let credentials = TrackerCredentials {
        email: "qa@example.com".into(),
        api_token: "token".into(),
    };
    let transport = HttpTransport::new(
        "https://example.atlassian.net/",
        &credentials,
        Duration::from_secs(5),
    );
    assert!(transport.is_ok());
}

#[test]
fn test_transport_error_display() {
    let err = TransportError::Timeout(Duration::from_secs(30));
    assert_eq!(err.to_string(), "request timed out after 30s");
}
