// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::path::PathBuf;
use std::sync::Mutex;

// Serializes tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_vars_constants() {
    assert_eq!(vars::BUGTALLY_TIMINGS, "BUGTALLY_TIMINGS");
    assert_eq!(vars::BUGTALLY_CONFIG, "BUGTALLY_CONFIG");
    assert_eq!(vars::BUGTALLY_STATE_DIR, "BUGTALLY_STATE_DIR");
    assert_eq!(vars::JIRA_EMAIL, "JIRA_EMAIL");
    assert_eq!(vars::QATRACKER_PASSWORD, "QATRACKER_PASSWORD");
    assert_eq!(vars::RUST_LOG, "RUST_LOG");
}

#[test]
fn test_timings_toggle() {
    let _lock = ENV_MUTEX.lock().unwrap();
    std::env::remove_var(vars::BUGTALLY_TIMINGS);
    assert!(!timings());
    std::env::set_var(vars::BUGTALLY_TIMINGS, "yes");
    assert!(timings());
    std::env::remove_var(vars::BUGTALLY_TIMINGS);
}

#[test]
fn test_state_dir_set_and_unset() {
    let _lock = ENV_MUTEX.lock().unwrap();
    std::env::set_var(vars::BUGTALLY_STATE_DIR, "/custom/state");
    assert_eq!(state_dir(), Some(PathBuf::from("/custom/state")));
    std::env::remove_var(vars::BUGTALLY_STATE_DIR);
    assert_eq!(state_dir(), None);
}

#[test]
fn test_blank_value_counts_as_unset() {
    let _lock = ENV_MUTEX.lock().unwrap();
    std::env::set_var(vars::BUGTALLY_CONFIG, "   ");
    assert_eq!(config_path(), None);
    std::env::set_var(vars::BUGTALLY_CONFIG, "/etc/bugtally.toml");
    assert_eq!(config_path(), Some(PathBuf::from("/etc/bugtally.toml")));
    std::env::remove_var(vars::BUGTALLY_CONFIG);
}
