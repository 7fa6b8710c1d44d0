// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run configuration.
//!
//! Configuration is read from a TOML file (`bugtally.toml` by default) and
//! includes:
//! - `[tracker]`: base URL, saved filter id, page size, issue field names
//! - `[portal]`: form URL, WebDriver endpoint, session artifact path,
//!   timeouts and UI locators
//!
//! Secrets never live in the file; they are read from the environment.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bt_core::FieldNames;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::env::{self, vars};
use crate::error::{Error, Result};
use crate::portal::Locator;

const CONFIG_FILE_NAME: &str = "bugtally.toml";
const SESSION_FILE_NAME: &str = "portal-session.json";

/// Top-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Issue tracker settings.
    pub tracker: TrackerConfig,
    /// Quality portal settings.
    pub portal: PortalConfig,
}

/// Issue tracker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Tracker base URL. `JIRA_BASE_URL` overrides it when set.
    #[serde(default)]
    pub base_url: String,
    /// Saved filter whose query selects the bugs to count.
    pub filter_id: String,
    /// Issues requested per search page (default: 100).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Issue fields carrying platform and severity.
    #[serde(default)]
    pub fields: FieldNames,
}

/// Quality portal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// URL of the data-entry form (also where login happens).
    pub url: String,
    /// WebDriver endpoint, e.g. a local chromedriver (default: `http://localhost:4444`).
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    /// Run the browser without a window (default: true).
    #[serde(default = "default_headless")]
    pub headless: bool,
    /// Where the session artifact is stored. Defaults to the state directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_path: Option<PathBuf>,
    /// Bounded waits for every UI suspension point.
    #[serde(default)]
    pub timeouts: Timeouts,
    /// How form controls are located.
    #[serde(default)]
    pub locators: Locators,
}

/// Timeouts in milliseconds for portal automation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Wait for the post-login marker.
    pub login_ms: u64,
    /// Wait for a control to become usable (unlock, save surface, options).
    pub step_ms: u64,
    /// Wait for the form to lock again after submit.
    pub confirm_ms: u64,
    /// Deadline for one whole platform.
    pub platform_ms: u64,
    /// Interval between liveness polls.
    pub poll_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts {
            login_ms: 15_000,
            step_ms: 5_000,
            confirm_ms: 10_000,
            platform_ms: 60_000,
            poll_ms: 100,
        }
    }
}

impl Timeouts {
    pub fn login(&self) -> Duration {
        Duration::from_millis(self.login_ms)
    }

    pub fn step(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }

    pub fn confirm(&self) -> Duration {
        Duration::from_millis(self.confirm_ms)
    }

    pub fn platform(&self) -> Duration {
        Duration::from_millis(self.platform_ms)
    }

    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }
}

/// UI locators for the portal pages.
///
/// Overriding `fields` replaces the whole severity field table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locators {
    pub login_field: Locator,
    pub password_field: Locator,
    pub login_button: Locator,
    /// Visible only while logged in; proves a session is live.
    pub logged_in_marker: Locator,
    /// Control that unlocks the numeric inputs.
    pub unlock: Locator,
    /// Input whose enabled state reflects whether the form is editable.
    pub editable_probe: Locator,
    /// Portal field key → numeric input.
    pub fields: BTreeMap<String, Locator>,
    /// Opens the save surface.
    pub save_link: Locator,
    /// Project selector on the save surface.
    pub project_select: Locator,
    pub submit: Locator,
    /// Dismisses the save surface during recovery.
    pub cancel: Locator,
}

impl Default for Locators {
    fn default() -> Self {
        let fields = ["blocker", "critical", "major", "minor", "trivial"]
            .into_iter()
            .map(|key| (key.to_string(), Locator::css(format!("#{}", key))))
            .collect();
        Locators {
            login_field: Locator::css("input[name='login']"),
            password_field: Locator::css("input[name='password']"),
            login_button: Locator::xpath("//button[normalize-space()='Log in']"),
            logged_in_marker: Locator::xpath("//button[normalize-space()='Log out']"),
            unlock: Locator::css("#project-size-medium"),
            editable_probe: Locator::css("#blocker"),
            fields,
            save_link: Locator::xpath("//a[starts-with(normalize-space(), \"Save the result to 'Quality\")]"),
            project_select: Locator::css("select"),
            submit: Locator::xpath("//button[normalize-space()='Save']"),
            cancel: Locator::xpath("//button[normalize-space()='Cancel']"),
        }
    }
}

fn default_page_size() -> u32 {
    100
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

/// Parses `value` as an absolute http(s) URL with a host.
fn parse_http_url(value: &str) -> std::result::Result<Url, String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err("missing host".to_string());
    }
    Ok(url)
}

impl Config {
    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {}", e)))
    }

    /// Loads, applies environment overrides, and validates a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read config {}: {}", path.display(), e))
        })?;
        let mut config = Config::from_toml(&content)?;
        if let Some(base_url) = env::tracker_base_url() {
            config.tracker.base_url = base_url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would otherwise fail late, mid-run.
    pub fn validate(&self) -> Result<()> {
        let tracker = &self.tracker;
        parse_http_url(&tracker.base_url).map_err(|reason| {
            Error::Config(format!(
                "tracker.base_url must be an http(s) URL (or set {}), got '{}': {}",
                vars::JIRA_BASE_URL,
                tracker.base_url,
                reason
            ))
        })?;
        if tracker.filter_id.trim().is_empty() {
            return Err(Error::Config("tracker.filter_id cannot be empty".to_string()));
        }
        if !(1..=5000).contains(&tracker.page_size) {
            return Err(Error::Config(format!(
                "tracker.page_size must be between 1 and 5000, got {}",
                tracker.page_size
            )));
        }
        if tracker.fields.platform.is_empty() || tracker.fields.severity.is_empty() {
            return Err(Error::Config("tracker.fields entries cannot be empty".to_string()));
        }

        let portal = &self.portal;
        parse_http_url(&portal.url).map_err(|reason| {
            Error::Config(format!(
                "portal.url must be an http(s) URL, got '{}': {}",
                portal.url, reason
            ))
        })?;
        parse_http_url(&portal.webdriver_url).map_err(|reason| {
            Error::Config(format!(
                "portal.webdriver_url must be an http(s) URL, got '{}': {}",
                portal.webdriver_url, reason
            ))
        })?;
        let t = &portal.timeouts;
        if [t.login_ms, t.step_ms, t.confirm_ms, t.platform_ms, t.poll_ms].contains(&0) {
            return Err(Error::Config("portal.timeouts values must be positive".to_string()));
        }
        Ok(())
    }

    /// Path of the portal session artifact.
    pub fn session_path(&self) -> PathBuf {
        match &self.portal.session_path {
            Some(path) => path.clone(),
            None => state_dir().join(SESSION_FILE_NAME),
        }
    }
}

/// Resolves which config file to read: explicit path, `BUGTALLY_CONFIG`,
/// then `./bugtally.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    env::config_path().unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Directory for persisted state (session artifact and its lock).
pub fn state_dir() -> PathBuf {
    if let Some(dir) = env::state_dir() {
        return dir;
    }
    if let Some(dir) = env::xdg_state_home() {
        return dir.join("bugtally");
    }
    dirs::home_dir()
        .map(|h| h.join(".local/state/bugtally"))
        .unwrap_or_else(|| PathBuf::from(".local/state/bugtally"))
}

/// Tracker credentials: account email and API token.
#[derive(Clone)]
pub struct TrackerCredentials {
    pub email: String,
    pub api_token: String,
}

impl TrackerCredentials {
    /// Reads `JIRA_EMAIL` and `JIRA_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env::non_empty)
    }

    /// Reads credentials through `lookup`, which returns a variable's value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(TrackerCredentials {
            email: lookup(vars::JIRA_EMAIL).ok_or(Error::MissingEnv(vars::JIRA_EMAIL))?,
            api_token: lookup(vars::JIRA_API_TOKEN)
                .ok_or(Error::MissingEnv(vars::JIRA_API_TOKEN))?,
        })
    }
}

impl fmt::Debug for TrackerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerCredentials")
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// Portal login and password.
#[derive(Clone)]
pub struct PortalCredentials {
    pub login: String,
    pub password: String,
}

impl PortalCredentials {
    /// Reads `QATRACKER_LOGIN` and `QATRACKER_PASSWORD`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env::non_empty)
    }

    /// Reads credentials through `lookup`, which returns a variable's value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(PortalCredentials {
            login: lookup(vars::QATRACKER_LOGIN).ok_or(Error::MissingEnv(vars::QATRACKER_LOGIN))?,
            password: lookup(vars::QATRACKER_PASSWORD)
                .ok_or(Error::MissingEnv(vars::QATRACKER_PASSWORD))?,
        })
    }
}

impl fmt::Debug for PortalCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalCredentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
