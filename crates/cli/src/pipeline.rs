// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The end-to-end run: tracker → counts → plan → portal.
//!
//! Steps run strictly in sequence. Retrieval failures end the run with an
//! error. Failures in the portal phase (lock, driver start, login) end only
//! that phase: the summary is still produced with `sync_error` set.

use std::future::Future;

use bt_core::{CountTable, FieldNames, SyncPlan};
use schemars::JsonSchema;
use serde::Serialize;

use crate::config::{Config, PortalCredentials};
use crate::error::{Error, Result};
use crate::portal::{Driver, DriverResult, SessionAgent};
use crate::sync::{RunLock, SyncOrchestrator, SyncReport};
use crate::time_phase;
use crate::tracker::{FetchResult, Transport, TrackerClient};

/// Everything learned from the tracker, before the portal is touched.
#[derive(Debug, Clone)]
pub struct Retrieval {
    pub query: String,
    pub fetch: FetchResult,
    pub counts: CountTable,
    pub plan: SyncPlan,
}

/// What a run did, for printing or JSON output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RunSummary {
    /// Saved filter the issues came from.
    pub filter_id: String,
    /// Query the filter resolved to.
    pub query: String,
    /// Number of issues retrieved.
    pub issues_fetched: usize,
    /// True when pagination ended ambiguously and counts may be low.
    pub partial: bool,
    /// Why the data may be partial.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Platform → severity → count, as seen in the tracker.
    pub counts: CountTable,
    /// Values the portal should hold per platform.
    pub plan: SyncPlan,
    /// One outcome per platform; empty for dry runs.
    pub outcomes: SyncReport,
    /// Set when the portal phase could not start or log in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_error: Option<String>,
    /// True when the portal was not touched on purpose.
    pub dry_run: bool,
}

impl RunSummary {
    /// Error to exit with once the summary has been shown.
    pub fn check(&self) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        let synced = self.outcomes.succeeded().count();
        let aborted = match self.sync_error {
            Some(_) => self.plan.platforms.len(),
            None => self.outcomes.aborted().count(),
        };
        if aborted > 0 {
            return Err(Error::PartialSync { synced, aborted });
        }
        Ok(())
    }
}

/// Portal access for a live run.
pub struct PortalAccess<F> {
    pub credentials: PortalCredentials,
    /// Starts the UI surface; called once, after retrieval succeeded.
    pub start_driver: F,
}

pub struct Pipeline<'c, T: Transport> {
    config: &'c Config,
    tracker: TrackerClient<T>,
}

impl<'c, T: Transport> Pipeline<'c, T> {
    pub fn new(config: &'c Config, tracker: TrackerClient<T>) -> Self {
        Pipeline { config, tracker }
    }

    fn fields(&self) -> &FieldNames {
        &self.config.tracker.fields
    }

    /// Authenticate, resolve the filter, fetch, aggregate, plan.
    pub async fn retrieve(&self) -> Result<Retrieval> {
        let filter_id = &self.config.tracker.filter_id;

        time_phase!("tracker::authenticate", { self.tracker.authenticate().await? });
        let query = time_phase!("tracker::resolve_filter", {
            self.tracker.resolve_filter(filter_id).await?
        });
        let fetch = time_phase!("tracker::fetch", {
            self.tracker
                .fetch_all(&query, &self.fields().as_request_fields())
                .await?
        });

        let issues = fetch.to_issues(self.fields())?;
        let counts = time_phase!("aggregate", { CountTable::aggregate(&issues) });
        let plan = SyncPlan::from_issues(&issues);
        tracing::info!(
            issues = issues.len(),
            platforms = counts.platforms().count(),
            "counts ready"
        );

        Ok(Retrieval {
            query,
            fetch,
            counts,
            plan,
        })
    }

    /// Lock, establish a portal session, and replay the plan.
    pub async fn sync<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        credentials: &PortalCredentials,
        plan: &SyncPlan,
    ) -> Result<SyncReport> {
        let session_path = self.config.session_path();
        let _lock = RunLock::acquire(&RunLock::path_for(&session_path))?;

        let agent = SessionAgent::new(self.config.portal.clone(), session_path);
        time_phase!("portal::session", { agent.establish(driver, credentials).await? });

        let report = time_phase!("portal::sync", {
            SyncOrchestrator::new(driver, &self.config.portal)
                .run(plan)
                .await
        });
        Ok(report)
    }

    /// The whole run. `portal` is `None` for a dry run.
    pub async fn run<D, F, Fut>(&self, portal: Option<PortalAccess<F>>) -> Result<RunSummary>
    where
        D: Driver,
        F: FnOnce() -> Fut,
        Fut: Future<Output = DriverResult<D>>,
    {
        let retrieval = self.retrieve().await?;
        let mut summary = RunSummary {
            filter_id: self.config.tracker.filter_id.clone(),
            query: retrieval.query,
            issues_fetched: retrieval.fetch.issues.len(),
            partial: !retrieval.fetch.is_complete(),
            warning: retrieval.fetch.warning.as_ref().map(ToString::to_string),
            counts: retrieval.counts,
            plan: retrieval.plan,
            outcomes: SyncReport::new(),
            sync_error: None,
            dry_run: portal.is_none(),
        };

        let Some(access) = portal else {
            tracing::info!("dry run: portal not touched");
            return Ok(summary);
        };

        let mut driver = match (access.start_driver)().await {
            Ok(driver) => driver,
            Err(e) => {
                tracing::error!(error = %e, "could not start the browser");
                summary.sync_error = Some(e.to_string());
                return Ok(summary);
            }
        };

        match self.sync(&mut driver, &access.credentials, &summary.plan).await {
            Ok(report) => summary.outcomes = report,
            Err(e) => {
                tracing::error!(error = %e, "portal phase failed");
                summary.sync_error = Some(e.to_string());
            }
        }

        if let Err(e) = driver.quit().await {
            tracing::debug!(error = %e, "browser quit failed");
        }
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
