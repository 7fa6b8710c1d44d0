// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::portal::DriverError;
use crate::tracker::TransportError;

/// All possible errors that can occur in the btrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("tracker authentication failed: {0}\n  hint: check JIRA_EMAIL and JIRA_API_TOKEN")]
    Auth(String),

    #[error("filter not found: {0}\n  hint: check tracker.filter_id and that the filter is shared with this account")]
    FilterNotFound(String),

    #[error("fetch failed on page {page}: HTTP {status}: {message}")]
    Fetch {
        page: usize,
        status: u16,
        message: String,
    },

    #[error("tracker request failed: HTTP {status}: {message}")]
    Tracker { status: u16, message: String },

    #[error("portal login failed: {0}\n  hint: check QATRACKER_LOGIN and QATRACKER_PASSWORD")]
    Login(String),

    #[error("portal session error: {0}")]
    Session(String),

    #[error("another sync holds {0}\n  hint: wait for it to finish; concurrent syncs would corrupt the portal form")]
    Locked(String),

    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("config error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("driver error: {0}")]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Core(#[from] bt_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sync incomplete: {synced} synced, {aborted} aborted")]
    PartialSync { synced: usize, aborted: usize },
}

/// A specialized Result type for btrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
