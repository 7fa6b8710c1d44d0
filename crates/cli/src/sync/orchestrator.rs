// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replays a [`SyncPlan`] into the portal form, one platform at a time.
//!
//! Per platform the form walks `Idle → FormEnabled → Filled → Submitted →
//! Idle`. A failure at any step aborts only that platform: the outcome is
//! recorded, the form is reset, and the next platform starts from `Idle`.

use std::time::Duration;

use bt_core::{PlatformPlan, SyncPlan};

use crate::config::PortalConfig;
use crate::portal::Driver;

use super::form::PortalForm;
use super::outcome::{SyncError, SyncOutcome, SyncReport, SyncStage};

/// Where the form is in the per-platform cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    FormEnabled,
    Filled,
    Submitted,
}

pub struct SyncOrchestrator<'a, D: Driver + ?Sized> {
    driver: &'a mut D,
    portal: &'a PortalConfig,
    state: FormState,
}

impl<'a, D: Driver + ?Sized> SyncOrchestrator<'a, D> {
    pub fn new(driver: &'a mut D, portal: &'a PortalConfig) -> Self {
        SyncOrchestrator {
            driver,
            portal,
            state: FormState::Idle,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Sync every platform in `plan`. Never fails as a whole; per-platform
    /// failures are in the report.
    pub async fn run(&mut self, plan: &SyncPlan) -> SyncReport {
        let mut report = SyncReport::new();
        let deadline = self.portal.timeouts.platform();

        if let Err(e) = self.driver.navigate(&self.portal.url).await {
            tracing::warn!(error = %e, "could not open the portal form");
        }

        for platform in &plan.platforms {
            let outcome = match self.sync_within(platform, deadline).await {
                Ok(()) => {
                    tracing::info!(platform = %platform.platform, project = %platform.project, "synced");
                    SyncOutcome::synced(&platform.platform, &platform.project)
                }
                Err(error) => {
                    tracing::warn!(
                        platform = %platform.platform,
                        stage = %error.stage,
                        reason = %error.reason,
                        "platform aborted"
                    );
                    self.recover().await;
                    SyncOutcome::aborted(&platform.platform, &platform.project, error)
                }
            };
            report.push(outcome);
        }

        for (platform, issues) in &plan.unmapped_platforms {
            tracing::info!(platform = %platform, issues, "skipped: no portal project");
            report.push(SyncOutcome::skipped(
                platform,
                format!("no portal project for this platform ({} issue(s))", issues),
            ));
        }

        report
    }

    async fn sync_within(
        &mut self,
        platform: &PlatformPlan,
        deadline: Duration,
    ) -> Result<(), SyncError> {
        match tokio::time::timeout(deadline, self.sync_platform(platform)).await {
            Ok(result) => result,
            Err(_) => Err(SyncError::new(
                SyncStage::Deadline,
                format!("platform not finished within {:?}", deadline),
            )),
        }
    }

    async fn sync_platform(&mut self, platform: &PlatformPlan) -> Result<(), SyncError> {
        let form = PortalForm::new(self.portal);
        tracing::debug!(platform = %platform.platform, total = platform.total(), "syncing");

        form.enable(&mut *self.driver).await?;
        self.transition(FormState::FormEnabled);

        form.fill(&mut *self.driver, &platform.values).await?;
        self.transition(FormState::Filled);

        form.open_save_dialog(&mut *self.driver).await?;
        form.select_project(&mut *self.driver, &platform.project).await?;
        form.submit(&mut *self.driver).await?;
        self.transition(FormState::Submitted);

        form.await_confirmation(&mut *self.driver).await?;
        self.transition(FormState::Idle);
        Ok(())
    }

    async fn recover(&mut self) {
        PortalForm::new(self.portal).recover(&mut *self.driver).await;
        self.transition(FormState::Idle);
    }

    fn transition(&mut self, next: FormState) {
        tracing::trace!(from = ?self.state, to = ?next, "form state");
        self.state = next;
    }
}
