// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::aggregate::aggregate;
use crate::issue::{Issue, UNKNOWN_LABEL};

fn issue(id: &str, severity: Option<&str>, platforms: &[&str]) -> Issue {
    Issue::new(id, severity, platforms.iter().copied())
}

#[test]
fn visits_every_declared_platform_in_order() {
    let table = aggregate(&[issue("1", Some("High"), &["Tizen"])]);
    let plan = SyncPlan::build(&table);
    let order: Vec<_> = plan.platforms.iter().map(|p| p.platform.as_str()).collect();
    assert_eq!(
        order,
        vec!["WebOS", "FireTV", "iOS", "Tizen", "Android", "AndroidTV", "AppleTV"]
    );
}

#[test]
fn unseen_platforms_are_explicitly_zeroed() {
    let plan = SyncPlan::build(&CountTable::new());
    for platform in &plan.platforms {
        assert_eq!(platform.values.len(), 5);
        assert_eq!(platform.total(), 0);
    }
}

#[test]
fn maps_severities_to_fields() {
    let table = aggregate(&[
        issue("1", Some("Highest"), &["WebOS"]),
        issue("2", Some("High"), &["WebOS"]),
        issue("3", Some("High"), &["WebOS"]),
        issue("4", Some("Lowest"), &["WebOS"]),
    ]);
    let plan = SyncPlan::build(&table);
    let webos = plan.get("WebOS").unwrap();
    assert_eq!(webos.project, "LSI (ex KCTS) - WebOS");
    assert_eq!(webos.value("blocker"), 1);
    assert_eq!(webos.value("critical"), 2);
    assert_eq!(webos.value("major"), 0);
    assert_eq!(webos.value("trivial"), 1);
}

#[test]
fn unmapped_severity_is_skipped_not_fatal() {
    let table = aggregate(&[
        issue("1", None, &["iOS"]),
        issue("2", Some("Medium"), &["iOS"]),
    ]);
    let plan = SyncPlan::build(&table);
    let ios = plan.get("iOS").unwrap();
    assert_eq!(ios.value("major"), 1);
    assert_eq!(ios.total(), 1);
    assert_eq!(ios.skipped_severities.get(UNKNOWN_LABEL), Some(&1));
}

#[test]
fn unmapped_platforms_are_reported() {
    let table = aggregate(&[
        issue("1", Some("High"), &["Chromecast"]),
        issue("2", Some("High"), &[]),
        issue("3", Some("Low"), &["Chromecast"]),
    ]);
    let plan = SyncPlan::build(&table);
    assert_eq!(plan.unmapped_platforms.get("Chromecast"), Some(&2));
    assert_eq!(plan.unmapped_platforms.get(UNKNOWN_LABEL), Some(&1));
    assert!(plan.platforms.iter().all(|p| p.total() == 0));
}

#[test]
fn casing_variants_merge_into_one_platform() {
    let table = aggregate(&[
        issue("1", Some("High"), &["WebOS"]),
        issue("2", Some("high"), &["webos"]),
    ]);
    let plan = SyncPlan::build(&table);
    let webos = plan.get("WebOS").unwrap();
    assert_eq!(webos.value("critical"), 2);
    assert_eq!(webos.source_labels, vec!["WebOS".to_string(), "webos".to_string()]);
}

#[test]
fn issue_with_two_spellings_is_planned_once() {
    let plan = SyncPlan::from_issues(&[issue("1", Some("High"), &["iOS", "IOS"])]);
    let ios = plan.get("iOS").unwrap();
    assert_eq!(ios.value("critical"), 1);
    assert_eq!(ios.total(), 1);
    assert_eq!(ios.source_labels, vec!["IOS".to_string(), "iOS".to_string()]);
}

#[test]
fn from_issues_matches_build_without_spelling_overlap() {
    let issues = [
        issue("1", Some("High"), &["WebOS", "Tizen"]),
        issue("2", Some("high"), &["webos"]),
        issue("3", Some("Low"), &["Chromecast"]),
        issue("4", None, &["Android"]),
    ];
    let from_issues = SyncPlan::from_issues(&issues);
    let from_table = SyncPlan::build(&aggregate(&issues));
    assert_eq!(from_issues.platforms.len(), from_table.platforms.len());
    for (a, b) in from_issues.platforms.iter().zip(&from_table.platforms) {
        assert_eq!(a.values, b.values, "{}", a.platform);
        assert_eq!(a.skipped_severities, b.skipped_severities, "{}", a.platform);
    }
    assert_eq!(from_issues.unmapped_platforms, from_table.unmapped_platforms);
    assert_eq!(
        from_issues.get("WebOS").unwrap().source_labels,
        vec!["WebOS".to_string(), "webos".to_string()]
    );
}

#[test]
fn building_twice_gives_identical_plans() {
    let table = aggregate(&[
        issue("1", Some("High"), &["WebOS", "Tizen"]),
        issue("2", Some("Low"), &["Android"]),
    ]);
    assert_eq!(SyncPlan::build(&table), SyncPlan::build(&table));
}
