// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! What the portal should hold after a sync, derived from a [`CountTable`].
//!
//! A plan lists every declared platform in table order, with an absolute
//! value for every portal severity field. Absent counts are written as zero,
//! so submitting the same plan twice leaves the portal in the same state.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::aggregate::CountTable;
use crate::issue::Issue;
use crate::mapping::{self, PLATFORMS, SEVERITIES};

/// Values to submit for one portal project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct PlatformPlan {
    /// Declared platform key.
    pub platform: String,
    /// Portal project the values are saved to.
    pub project: String,
    /// Portal field key → absolute count.
    pub values: BTreeMap<String, u64>,
    /// Raw tracker labels merged into this row.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_labels: Vec<String>,
    /// Severity labels with no portal field, and how many issues they held.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub skipped_severities: BTreeMap<String, u64>,
}

impl PlatformPlan {
    fn empty(platform: &str, project: &str) -> Self {
        PlatformPlan {
            platform: platform.to_string(),
            project: project.to_string(),
            values: SEVERITIES.targets().map(|f| (f.to_string(), 0)).collect(),
            source_labels: Vec::new(),
            skipped_severities: BTreeMap::new(),
        }
    }

    /// Value planned for a portal field, zero when the field is unknown.
    pub fn value(&self, field: &str) -> u64 {
        self.values.get(field).copied().unwrap_or(0)
    }

    /// Sum of all planned field values.
    pub fn total(&self) -> u64 {
        self.values.values().sum()
    }
}

/// Per-platform submissions for one sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct SyncPlan {
    /// One entry per declared platform, in declared order.
    pub platforms: Vec<PlatformPlan>,
    /// Platform labels with no portal project → issues counted under them.
    pub unmapped_platforms: BTreeMap<String, u64>,
}

impl SyncPlan {
    /// Builds the plan from issues, counting each issue at most once per
    /// declared platform however many spellings of it the issue carries.
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut table = CountTable::new();
        let mut spellings: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
        for issue in issues {
            let platforms = issue
                .platforms
                .iter()
                .map(|label| match mapping::canonical_platform(label) {
                    Some(key) => {
                        spellings.entry(key).or_default().insert(label.clone());
                        key.to_string()
                    }
                    None => label.clone(),
                })
                .collect();
            table.record(&Issue {
                platforms,
                ..issue.clone()
            });
        }

        let mut plan = SyncPlan::build(&table);
        for platform in &mut plan.platforms {
            if let Some(labels) = spellings.remove(platform.platform.as_str()) {
                platform.source_labels = labels.into_iter().collect();
            }
        }
        plan
    }

    /// Builds the plan for `table`.
    ///
    /// Rows whose labels differ only in case are summed. An issue carrying
    /// two spellings of one platform sits in both rows, so it is counted
    /// twice here; use [`SyncPlan::from_issues`] when issues are at hand.
    pub fn build(table: &CountTable) -> Self {
        let mut platforms: Vec<PlatformPlan> = PLATFORMS
            .entries()
            .map(|(platform, project)| PlatformPlan::empty(platform, project))
            .collect();
        let mut unmapped_platforms = BTreeMap::new();

        for (label, row) in table.rows() {
            let Some(canonical) = mapping::canonical_platform(label) else {
                tracing::warn!(platform = label, "no portal project for platform, skipping");
                unmapped_platforms.insert(label.to_string(), table.platform_total(label));
                continue;
            };
            let Some(plan) = platforms.iter_mut().find(|p| p.platform == canonical) else {
                continue;
            };
            plan.source_labels.push(label.to_string());

            for (severity, count) in row {
                match mapping::map_severity(severity) {
                    Some(field) => *plan.values.entry(field.to_string()).or_insert(0) += count,
                    None => {
                        tracing::warn!(
                            platform = label,
                            severity = severity.as_str(),
                            count,
                            "no portal field for severity, skipping"
                        );
                        *plan.skipped_severities.entry(severity.clone()).or_insert(0) += count;
                    }
                }
            }
        }

        SyncPlan {
            platforms,
            unmapped_platforms,
        }
    }

    /// Plan entry for a declared platform key.
    pub fn get(&self, platform: &str) -> Option<&PlatformPlan> {
        self.platforms.iter().find(|p| p.platform == platform)
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
