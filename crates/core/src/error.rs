// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for bt-core operations.

use thiserror::Error;

/// All possible errors that can occur in bt-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed issue: {reason}\n  hint: the tracker returned an issue without a usable identity")]
    MalformedIssue { reason: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for bt-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
