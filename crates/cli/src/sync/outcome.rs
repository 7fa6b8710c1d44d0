// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-platform results of a sync run.

use std::fmt;

use schemars::JsonSchema;
use serde::Serialize;

/// Form step at which a platform's sync failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncStage {
    /// Unlocking the form for editing.
    Enable,
    /// Writing field values.
    Fill,
    /// Opening the save dialog.
    Submit,
    /// Choosing the destination project.
    Select,
    /// Waiting for the portal to accept the save.
    Confirm,
    /// The platform ran past its overall deadline.
    Deadline,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncStage::Enable => "enable",
            SyncStage::Fill => "fill",
            SyncStage::Submit => "submit",
            SyncStage::Select => "select",
            SyncStage::Confirm => "confirm",
            SyncStage::Deadline => "deadline",
        };
        write!(f, "{}", s)
    }
}

/// Why one platform's sync stopped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} failed: {reason}")]
pub struct SyncError {
    pub stage: SyncStage,
    pub reason: String,
}

impl SyncError {
    pub fn new(stage: SyncStage, reason: impl Into<String>) -> Self {
        SyncError {
            stage,
            reason: reason.into(),
        }
    }
}

/// What happened to one platform. Built once, never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct SyncOutcome {
    platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<String>,
    attempted: bool,
    succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<SyncStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl SyncOutcome {
    pub fn synced(platform: impl Into<String>, project: impl Into<String>) -> Self {
        SyncOutcome {
            platform: platform.into(),
            project: Some(project.into()),
            attempted: true,
            succeeded: true,
            stage: None,
            reason: None,
        }
    }

    pub fn aborted(
        platform: impl Into<String>,
        project: impl Into<String>,
        error: SyncError,
    ) -> Self {
        SyncOutcome {
            platform: platform.into(),
            project: Some(project.into()),
            attempted: true,
            succeeded: false,
            stage: Some(error.stage),
            reason: Some(error.reason),
        }
    }

    /// A platform that was never attempted, such as one with no portal project.
    pub fn skipped(platform: impl Into<String>, reason: impl Into<String>) -> Self {
        SyncOutcome {
            platform: platform.into(),
            project: None,
            attempted: false,
            succeeded: false,
            stage: None,
            reason: Some(reason.into()),
        }
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn attempted(&self) -> bool {
        self.attempted
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn stage(&self) -> Option<SyncStage> {
        self.stage
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn is_aborted(&self) -> bool {
        self.attempted && !self.succeeded
    }
}

/// All outcomes of one run, in attempt order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct SyncReport {
    outcomes: Vec<SyncOutcome>,
}

impl SyncReport {
    pub fn new() -> Self {
        SyncReport::default()
    }

    pub fn push(&mut self, outcome: SyncOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[SyncOutcome] {
        &self.outcomes
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &SyncOutcome> {
        self.outcomes.iter().filter(|o| o.succeeded())
    }

    pub fn aborted(&self) -> impl Iterator<Item = &SyncOutcome> {
        self.outcomes.iter().filter(|o| o.is_aborted())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &SyncOutcome> {
        self.outcomes.iter().filter(|o| !o.attempted())
    }

    /// Look up the outcome for `platform`.
    pub fn get(&self, platform: &str) -> Option<&SyncOutcome> {
        self.outcomes.iter().find(|o| o.platform == platform)
    }

    /// Returns true if no attempted platform failed.
    pub fn is_clean(&self) -> bool {
        self.aborted().next().is_none()
    }
}
