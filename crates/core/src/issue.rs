// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracker issues as seen by the aggregator.
//!
//! The tracker returns loosely shaped JSON: the platform field may be a
//! scalar, an array, an option object, or absent, and the severity may be an
//! object with a `name`. Everything is normalized here so the rest of the
//! pipeline only sees plain labels.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Label used when the tracker reports no severity or no platform.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Names of the tracker fields carrying platform and severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    /// Field holding the platform label(s), usually a custom multi-select.
    #[serde(default = "default_platform_field")]
    pub platform: String,
    /// Field holding the severity label.
    #[serde(default = "default_severity_field")]
    pub severity: String,
}

fn default_platform_field() -> String {
    "customfield_10622".to_string()
}

fn default_severity_field() -> String {
    "priority".to_string()
}

impl Default for FieldNames {
    fn default() -> Self {
        FieldNames {
            platform: default_platform_field(),
            severity: default_severity_field(),
        }
    }
}

impl FieldNames {
    /// Field list to request from the tracker search endpoint.
    pub fn as_request_fields(&self) -> Vec<String> {
        vec![self.platform.clone(), self.severity.clone()]
    }
}

/// A bug issue reduced to the attributes the aggregator needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Tracker-assigned identity.
    pub id: String,
    /// Human-readable key (e.g. `PRJ-42`), when the tracker sends one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Severity label, [`UNKNOWN_LABEL`] when absent.
    pub severity: String,
    /// Platform labels, never empty.
    pub platforms: BTreeSet<String>,
}

impl Issue {
    /// Creates an issue, applying the same defaults as [`Issue::from_json`].
    pub fn new<I, S>(id: impl Into<String>, severity: Option<&str>, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let severity = severity
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_LABEL)
            .to_string();
        let mut platforms: BTreeSet<String> = platforms
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| !p.trim().is_empty())
            .collect();
        if platforms.is_empty() {
            platforms.insert(UNKNOWN_LABEL.to_string());
        }
        Issue {
            id: id.into(),
            key: None,
            severity,
            platforms,
        }
    }

    /// Normalizes a raw tracker issue.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedIssue`] if the issue has no usable `id`.
    /// Unexpected field shapes are not errors: they are logged and counted
    /// under [`UNKNOWN_LABEL`].
    pub fn from_json(raw: &Value, fields: &FieldNames) -> Result<Self> {
        let id = match raw.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => {
                return Err(Error::MalformedIssue {
                    reason: format!("unusable id {}", other),
                })
            }
            None => {
                return Err(Error::MalformedIssue {
                    reason: "missing id".to_string(),
                })
            }
        };
        let key = raw.get("key").and_then(Value::as_str).map(str::to_string);
        let field_values = raw.get("fields");

        let severity = field_values
            .and_then(|f| f.get(&fields.severity))
            .and_then(|v| label_of(v, &fields.severity));
        let platforms = platforms_of(
            field_values.and_then(|f| f.get(&fields.platform)),
            &fields.platform,
        );

        let mut issue = Issue::new(id, severity.as_deref(), platforms);
        issue.key = key;
        Ok(issue)
    }
}

/// Extracts a single label from a scalar or option-shaped value.
fn label_of(value: &Value, field: &str) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => match map.get("value").or_else(|| map.get("name")) {
            Some(inner @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => {
                label_of(inner, field)
            }
            _ => {
                tracing::warn!(field, "option object without value or name, treating as missing");
                None
            }
        },
        Value::Array(_) => {
            tracing::warn!(field, "unexpected array, treating as missing");
            None
        }
    }
}

fn platforms_of(value: Option<&Value>, field: &str) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(|v| label_of(v, field)).collect(),
        Some(other) => label_of(other, field).into_iter().collect(),
    }
}

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;
