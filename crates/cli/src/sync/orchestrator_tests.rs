// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::time::Duration;

use bt_core::{CountTable, Issue, SyncPlan, PLATFORMS};

use super::orchestrator::{FormState, SyncOrchestrator};
use super::outcome::SyncStage;
use crate::portal::test_helpers::{portal_config, FakePortal};

fn plan_for(issues: &[Issue]) -> SyncPlan {
    SyncPlan::build(&CountTable::aggregate(issues))
}

/// One High and one Lowest bug on every declared platform.
fn all_platforms_plan() -> SyncPlan {
    let issues: Vec<Issue> = PLATFORMS
        .entries()
        .enumerate()
        .flat_map(|(n, (platform, _))| {
            [
                Issue::new(format!("{}-a", n), Some("High"), [platform]),
                Issue::new(format!("{}-b", n), Some("Lowest"), [platform]),
            ]
        })
        .collect();
    plan_for(&issues)
}

const TIZEN: &str = "LSI (ex KCTS) - Tizen";
const IOS: &str = "LSI (ex KCTS) - iOS";
const WEBOS: &str = "LSI (ex KCTS) - WebOS";

#[tokio::test]
async fn test_all_platforms_sync() {
    let config = portal_config();
    let mut portal = FakePortal::with_all_projects().logged_in();
    let plan = all_platforms_plan();

    let report = SyncOrchestrator::new(&mut portal, &config).run(&plan).await;

    assert_eq!(report.outcomes().len(), 7);
    assert!(report.is_clean());
    assert_eq!(portal.submissions.len(), 7);
    let saved = portal.last_submission(IOS).unwrap();
    assert_eq!(saved.values["critical"], "1");
    assert_eq!(saved.values["trivial"], "1");
    assert_eq!(saved.values["blocker"], "0");
}

#[tokio::test]
async fn test_fourth_platform_confirm_timeout_is_isolated() {
    let config = portal_config();
    let mut portal = FakePortal::with_all_projects().logged_in();
    portal.unconfirmed.insert(TIZEN.to_string());
    let plan = all_platforms_plan();
    assert_eq!(plan.platforms[3].project, TIZEN);

    let mut orchestrator = SyncOrchestrator::new(&mut portal, &config);
    let report = orchestrator.run(&plan).await;
    assert_eq!(orchestrator.state(), FormState::Idle);

    let platforms: Vec<&str> = report.outcomes().iter().map(|o| o.platform()).collect();
    assert_eq!(
        platforms,
        ["WebOS", "FireTV", "iOS", "Tizen", "Android", "AndroidTV", "AppleTV"]
    );
    assert_eq!(report.succeeded().count(), 6);
    let tizen = report.get("Tizen").unwrap();
    assert!(tizen.is_aborted());
    assert_eq!(tizen.stage(), Some(SyncStage::Confirm));
    assert!(tizen.reason().unwrap().contains("unconfirmed"));

    // Recovery ran between Tizen and Android.
    assert_eq!(portal.count_actions("click xpath://button[normalize-space()='Cancel']"), 1);
    assert!(portal.last_submission("LSI (ex KCTS) - Android").is_some());
}

#[tokio::test]
async fn test_disabled_option_aborts_only_that_platform_at_select() {
    let config = portal_config();
    let mut portal = FakePortal::with_all_projects().logged_in();
    portal.projects.insert(IOS.to_string(), false);
    let plan = all_platforms_plan();

    let report = SyncOrchestrator::new(&mut portal, &config).run(&plan).await;

    let ios = report.get("iOS").unwrap();
    assert_eq!(ios.stage(), Some(SyncStage::Select));
    assert!(ios.reason().unwrap().contains("disabled"));
    assert_eq!(report.aborted().count(), 1);
    assert!(portal.last_submission(IOS).is_none());
}

#[tokio::test]
async fn test_disabled_save_button_aborts_at_submit_not_confirm() {
    let config = portal_config();
    let mut portal = FakePortal::with_all_projects()
        .logged_in()
        .disable(&config.locators.submit);
    let plan = all_platforms_plan();

    let report = SyncOrchestrator::new(&mut portal, &config).run(&plan).await;

    assert_eq!(report.aborted().count(), 7);
    assert!(report
        .outcomes()
        .iter()
        .all(|o| o.stage() == Some(SyncStage::Submit)));
    assert!(portal.submissions.is_empty());
}

#[tokio::test]
async fn test_missing_option_aborts_at_select() {
    let config = portal_config();
    let mut portal = FakePortal::with_all_projects().logged_in();
    portal.projects.remove(WEBOS);
    let plan = all_platforms_plan();

    let report = SyncOrchestrator::new(&mut portal, &config).run(&plan).await;

    let webos = report.get("WebOS").unwrap();
    assert_eq!(webos.stage(), Some(SyncStage::Select));
    assert!(webos.reason().unwrap().contains("not listed"));
    assert_eq!(report.succeeded().count(), 6);
}

#[tokio::test]
async fn test_platform_deadline() {
    let mut config = portal_config();
    config.timeouts.platform_ms = 100;
    let mut portal = FakePortal::with_all_projects().logged_in();
    portal
        .slow_submit
        .insert(WEBOS.to_string(), Duration::from_millis(500));
    let plan = all_platforms_plan();

    let report = SyncOrchestrator::new(&mut portal, &config).run(&plan).await;

    let webos = report.get("WebOS").unwrap();
    assert_eq!(webos.stage(), Some(SyncStage::Deadline));
    assert!(portal.last_submission(WEBOS).is_none());
    assert_eq!(report.succeeded().count(), 6);
}

#[tokio::test]
async fn test_resubmission_is_idempotent() {
    let config = portal_config();
    let mut portal = FakePortal::with_all_projects().logged_in();
    let plan = all_platforms_plan();

    SyncOrchestrator::new(&mut portal, &config).run(&plan).await;
    let first = portal.submissions.clone();
    SyncOrchestrator::new(&mut portal, &config).run(&plan).await;
    let second = portal.submissions[first.len()..].to_vec();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unseen_platform_is_written_as_zeros() {
    let config = portal_config();
    let mut portal = FakePortal::with_all_projects().logged_in();
    let plan = plan_for(&[Issue::new("1", Some("Highest"), ["WebOS"])]);

    let report = SyncOrchestrator::new(&mut portal, &config).run(&plan).await;

    assert!(report.is_clean());
    let tvos = portal.last_submission("LSI (ex KCTS) - tvOS").unwrap();
    assert_eq!(tvos.values.len(), 5);
    assert!(tvos.values.values().all(|v| v == "0"));
    assert_eq!(portal.last_submission(WEBOS).unwrap().values["blocker"], "1");
}

#[tokio::test]
async fn test_unmapped_platform_is_skipped() {
    let config = portal_config();
    let mut portal = FakePortal::with_all_projects().logged_in();
    let plan = plan_for(&[
        Issue::new("1", Some("High"), ["Chromecast"]),
        Issue::new("2", Some("High"), ["iOS"]),
    ]);

    let report = SyncOrchestrator::new(&mut portal, &config).run(&plan).await;

    assert_eq!(report.outcomes().len(), 8);
    let last = report.outcomes().last().unwrap();
    assert_eq!(last.platform(), "Chromecast");
    assert!(!last.attempted());
    assert_eq!(report.skipped().count(), 1);
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_logged_out_portal_aborts_every_platform_at_enable() {
    let config = portal_config();
    let mut portal = FakePortal::with_all_projects();
    let plan = all_platforms_plan();

    let report = SyncOrchestrator::new(&mut portal, &config).run(&plan).await;

    assert_eq!(report.aborted().count(), 7);
    assert!(report
        .aborted()
        .all(|o| o.stage() == Some(SyncStage::Enable)));
    assert!(portal.submissions.is_empty());
}
