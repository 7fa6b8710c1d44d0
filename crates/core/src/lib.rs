// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! bt-core: pure domain logic for bugtally
//!
//! Issue normalization, platform × severity aggregation, the static
//! tracker → portal category tables, and the sync plan derived from them.
//! Nothing in this crate performs I/O.

pub mod aggregate;
pub mod error;
pub mod issue;
pub mod mapping;
pub mod plan;

pub use aggregate::{aggregate, CountTable, SeverityCounts};
pub use error::{Error, Result};
pub use issue::{FieldNames, Issue, UNKNOWN_LABEL};
pub use mapping::{map_platform, map_severity, LookupTable, Resolved, PLATFORMS, SEVERITIES};
pub use plan::{PlatformPlan, SyncPlan};
