// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON output types that exist only at the command boundary.
//!
//! `bugtally run -o json` prints [`RunSummary`](crate::pipeline::RunSummary)
//! directly; the types here cover the other JSON outputs.

use bt_core::CountTable;
use schemars::JsonSchema;
use serde::Serialize;

use crate::pipeline::Retrieval;

/// Output of `bugtally fetch -o json`.
#[derive(Debug, JsonSchema, Serialize)]
pub struct CountsOutputJson {
    /// Saved filter the issues came from.
    pub filter_id: String,
    /// Query the filter resolved to.
    pub query: String,
    /// Number of issues retrieved.
    pub issues_fetched: usize,
    /// True when pagination ended ambiguously.
    pub partial: bool,
    /// Why the data may be partial.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Platform → severity → count.
    pub counts: CountTable,
}

impl CountsOutputJson {
    pub fn new(filter_id: &str, retrieval: Retrieval) -> Self {
        CountsOutputJson {
            filter_id: filter_id.to_string(),
            issues_fetched: retrieval.fetch.issues.len(),
            partial: !retrieval.fetch.is_complete(),
            warning: retrieval.fetch.warning.as_ref().map(ToString::to_string),
            query: retrieval.query,
            counts: retrieval.counts,
        }
    }
}
