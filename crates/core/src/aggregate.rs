// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Platform × severity aggregation.
//!
//! Keys are raw tracker labels. Mapping to portal categories happens later,
//! when the sync plan is built, so portal schema changes never touch this
//! module.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::issue::Issue;

/// Severity label → count for a single platform.
pub type SeverityCounts = BTreeMap<String, u64>;

/// Bug counts keyed by platform label, then severity label.
///
/// An issue with N platform labels contributes to N platform rows, so the
/// sum of a row equals the number of issues carrying that platform label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(transparent)]
pub struct CountTable {
    rows: BTreeMap<String, SeverityCounts>,
}

impl CountTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts `issues` into a fresh table.
    pub fn aggregate(issues: &[Issue]) -> Self {
        let mut table = CountTable::new();
        for issue in issues {
            table.record(issue);
        }
        table
    }

    /// Adds one issue to every platform row it carries.
    pub fn record(&mut self, issue: &Issue) {
        for platform in &issue.platforms {
            *self
                .rows
                .entry(platform.clone())
                .or_default()
                .entry(issue.severity.clone())
                .or_insert(0) += 1;
        }
    }

    /// Count for a single cell, zero when absent.
    pub fn get(&self, platform: &str, severity: &str) -> u64 {
        self.rows
            .get(platform)
            .and_then(|row| row.get(severity))
            .copied()
            .unwrap_or(0)
    }

    /// Severity counts for one platform label.
    pub fn row(&self, platform: &str) -> Option<&SeverityCounts> {
        self.rows.get(platform)
    }

    /// Platform labels present in the table, sorted.
    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Iterates `(platform, row)` pairs in label order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &SeverityCounts)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of issues counted under `platform`.
    pub fn platform_total(&self, platform: &str) -> u64 {
        self.rows
            .get(platform)
            .map(|row| row.values().sum())
            .unwrap_or(0)
    }

    /// Sum over every cell (counts fan-out, not distinct issues).
    pub fn total_cells(&self) -> u64 {
        self.rows.values().flat_map(|row| row.values()).sum()
    }

    /// Returns true if nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Counts `issues` into a fresh [`CountTable`].
pub fn aggregate(issues: &[Issue]) -> CountTable {
    CountTable::aggregate(issues)
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
