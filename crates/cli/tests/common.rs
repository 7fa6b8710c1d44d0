// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

const CREDENTIAL_VARS: &[&str] = &[
    "JIRA_BASE_URL",
    "JIRA_EMAIL",
    "JIRA_API_TOKEN",
    "QATRACKER_LOGIN",
    "QATRACKER_PASSWORD",
    "BUGTALLY_CONFIG",
];

/// The binary with credentials and config overrides scrubbed from the
/// environment, and state kept inside `state`.
pub fn bugtally(state: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("bugtally");
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd.env("BUGTALLY_STATE_DIR", state.path());
    cmd.current_dir(state.path());
    cmd
}

/// Write a valid config into `dir` and return its path.
pub fn write_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("bugtally.toml");
    std::fs::write(
        &path,
        r#"
[tracker]
base_url = "https://example.atlassian.net"
filter_id = "10042"

[portal]
url = "https://portal.example.com/qa-tracker/calculator"
"#,
    )
    .unwrap();
    path
}
