// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Issue source: the tracker's REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ TrackerClient │────►│  Transport  │────►│   Tracker   │
//! │ (auth/filter/ │◄────│   (trait)   │◄────│  REST API   │
//! │  pagination)  │     └─────────────┘     └─────────────┘
//! └───────────────┘
//! ```
//!
//! - Identity check against the configured account email
//! - Saved filter → query resolution
//! - Cursor pagination that either returns the whole result set, fails, or
//!   flags an ambiguous ending with [`IncompleteFetchWarning`]
//! - Injectable transport trait for testing

mod client;
mod transport;

pub use client::{
    FetchResult, IncompleteFetchWarning, IncompleteReason, Identity, TrackerClient,
    DEFAULT_PAGE_SIZE,
};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse, TransportResult};


#[cfg(test)]
pub(crate) mod transport_tests;
