// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracker client: identity check, filter resolution, bulk retrieval.
//!
//! Retrieval is all-or-nothing. A failed page discards everything fetched
//! so far, because aggregation needs a complete snapshot. The one ambiguous
//! ending (not last page, but no cursor to continue from) stops the loop
//! and is reported as an [`IncompleteFetchWarning`] alongside the issues.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use bt_core::{FieldNames, Issue};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::transport::{HttpTransport, Transport, TransportResponse};
use crate::config::{TrackerConfig, TrackerCredentials};
use crate::error::{Error, Result};

/// Issues requested per search page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 100;
const MAX_PAGE_SIZE: u32 = 5000;

const MYSELF_PATH: &str = "/rest/api/3/myself";
const FILTER_PATH: &str = "/rest/api/3/filter";
/// Placeholder origin for building and encoding request paths.
const PATH_ROOT: &str = "http://tracker.invalid/";
const SEARCH_PATH: &str = "/rest/api/3/search/jql";

/// The account the tracker credentials belong to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub account_id: String,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    jql: &'a str,
    fields: &'a [String],
    max_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_page_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPage {
    #[serde(default)]
    issues: Option<Vec<Value>>,
    #[serde(default)]
    next_page_token: Option<String>,
    #[serde(default)]
    is_last: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct FilterBody {
    #[serde(default)]
    jql: Option<String>,
}

/// Why pagination stopped without the tracker saying "last page".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncompleteReason {
    /// Not last, but no cursor to continue from.
    MissingCursor,
    /// The tracker handed back a cursor it had already given.
    RepeatedCursor,
}

/// Pagination ended ambiguously; the collected issues may be partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncompleteFetchWarning {
    pub reason: IncompleteReason,
    /// Pages received before stopping.
    pub pages: usize,
    /// Issues collected before stopping.
    pub issues: usize,
}

impl fmt::Display for IncompleteFetchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let why = match self.reason {
            IncompleteReason::MissingCursor => "tracker returned no cursor before the last page",
            IncompleteReason::RepeatedCursor => "tracker repeated a cursor",
        };
        write!(
            f,
            "incomplete fetch: {} after {} page(s), {} issue(s) collected; counts may be partial",
            why, self.pages, self.issues
        )
    }
}

/// Raw issues from a completed retrieval.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Issues in tracker order, across all pages.
    pub issues: Vec<Value>,
    /// Number of pages requested.
    pub pages: usize,
    /// Set when pagination ended ambiguously.
    pub warning: Option<IncompleteFetchWarning>,
}

impl FetchResult {
    /// Returns true if the tracker signalled the last page.
    pub fn is_complete(&self) -> bool {
        self.warning.is_none()
    }

    /// Normalizes the raw issues.
    pub fn to_issues(&self, fields: &FieldNames) -> Result<Vec<Issue>> {
        self.issues
            .iter()
            .map(|raw| Issue::from_json(raw, fields).map_err(Error::from))
            .collect()
    }
}

/// Client for the tracker's REST API.
pub struct TrackerClient<T: Transport = HttpTransport> {
    transport: T,
    expected_email: String,
    page_size: u32,
}

impl TrackerClient<HttpTransport> {
    /// Create a client with the default HTTPS transport.
    pub fn new(config: &TrackerConfig, credentials: &TrackerCredentials) -> Result<Self> {
        let transport = HttpTransport::new(
            &config.base_url,
            credentials,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(TrackerClient::with_transport(transport, credentials.email.clone())
            .with_page_size(config.page_size))
    }
}

impl<T: Transport> TrackerClient<T> {
    /// Create a client with a custom transport (for testing).
    pub fn with_transport(transport: T, expected_email: impl Into<String>) -> Self {
        TrackerClient {
            transport,
            expected_email: expected_email.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the search page size, clamped to what the tracker accepts.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Get the configured page size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Verify the credentials and that they belong to the configured account.
    pub async fn authenticate(&self) -> Result<Identity> {
        let response = self.transport.get(MYSELF_PATH).await?;
        match response.status {
            401 | 403 => {
                return Err(Error::Auth(format!(
                    "tracker rejected credentials (HTTP {})",
                    response.status
                )))
            }
            _ if !response.is_success() => return Err(tracker_error(&response)),
            _ => {}
        }

        let identity: Identity = serde_json::from_value(response.body)
            .map_err(|e| Error::Auth(format!("unreadable identity: {}", e)))?;

        let contact = identity.email_address.as_deref().map(str::trim).unwrap_or("");
        if contact.is_empty() {
            return Err(Error::Auth(format!(
                "account {} does not disclose an email address",
                identity.account_id
            )));
        }
        if !contact.eq_ignore_ascii_case(self.expected_email.trim()) {
            return Err(Error::Auth(format!(
                "credentials belong to {}, expected {}",
                contact, self.expected_email
            )));
        }

        tracing::info!(account = %identity.account_id, "tracker identity verified");
        Ok(identity)
    }

    /// Resolve a saved filter to its query string.
    pub async fn resolve_filter(&self, filter_id: &str) -> Result<String> {
        let path = filter_path(filter_id)?;
        let response = self.transport.get(&path).await?;
        match response.status {
            401 | 403 => {
                return Err(Error::Auth(format!(
                    "not allowed to read filter {} (HTTP {})",
                    filter_id, response.status
                )))
            }
            404 => return Err(Error::FilterNotFound(filter_id.to_string())),
            _ if !response.is_success() => return Err(tracker_error(&response)),
            _ => {}
        }

        let filter: FilterBody = serde_json::from_value(response.body)?;
        match filter.jql.filter(|q| !q.trim().is_empty()) {
            Some(query) => {
                tracing::info!(filter_id, query = %query, "filter resolved");
                Ok(query)
            }
            None => Err(Error::FilterNotFound(format!("{} (filter has no query)", filter_id))),
        }
    }

    /// Retrieve every issue matching `query`, following cursors to the end.
    pub async fn fetch_all(&self, query: &str, fields: &[String]) -> Result<FetchResult> {
        let mut issues: Vec<Value> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen_cursors: HashSet<String> = HashSet::new();
        let mut page = 0usize;

        let warning = loop {
            page += 1;
            let request = SearchRequest {
                jql: query,
                fields,
                max_results: self.page_size,
                next_page_token: cursor.as_deref(),
            };
            let body = serde_json::to_value(&request)?;
            let response = self.transport.post(SEARCH_PATH, body).await?;
            if !response.is_success() {
                return Err(Error::Fetch {
                    page,
                    status: response.status,
                    message: error_message(&response.body),
                });
            }

            let status = response.status;
            let parsed: SearchPage =
                serde_json::from_value(response.body).map_err(|e| Error::Fetch {
                    page,
                    status,
                    message: format!("malformed page: {}", e),
                })?;
            let received = parsed.issues.unwrap_or_default();
            let next = parsed.next_page_token.filter(|t| !t.is_empty());
            tracing::debug!(
                page,
                items = received.len(),
                has_cursor = next.is_some(),
                is_last = parsed.is_last.unwrap_or(false),
                "search page received"
            );
            issues.extend(received);

            if parsed.is_last == Some(true) {
                break None;
            }
            match next {
                None => break Some(IncompleteReason::MissingCursor),
                Some(token) if !seen_cursors.insert(token.clone()) => {
                    break Some(IncompleteReason::RepeatedCursor)
                }
                Some(token) => cursor = Some(token),
            }
        };

        let warning = warning.map(|reason| IncompleteFetchWarning {
            reason,
            pages: page,
            issues: issues.len(),
        });
        if let Some(w) = &warning {
            tracing::warn!("{}", w);
        }
        tracing::info!(pages = page, issues = issues.len(), "retrieval finished");

        Ok(FetchResult {
            issues,
            pages: page,
            warning,
        })
    }
}

fn tracker_error(response: &TransportResponse) -> Error {
    Error::Tracker {
        status: response.status,
        message: error_message(&response.body),
    }
}

/// Best-effort human message from an error body.
fn error_message(body: &Value) -> String {
    let messages: Vec<&str> = body
        .get("errorMessages")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if !messages.is_empty() {
        return messages.join("; ");
    }
    match body {
        Value::Null => "empty response".to_string(),
        Value::String(s) => s.chars().take(200).collect(),
        other => other.to_string().chars().take(200).collect(),
    }
}

/// API path of the saved filter `filter_id`, the id encoded as one segment.
fn filter_path(filter_id: &str) -> Result<String> {
    let mut url = Url::parse(PATH_ROOT).map_err(|e| Error::Config(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| Error::Config(format!("cannot build a path on {}", PATH_ROOT)))?
        .extend(FILTER_PATH.split('/').filter(|s| !s.is_empty()))
        .push(filter_id);
    Ok(url.path().to_string())
}
