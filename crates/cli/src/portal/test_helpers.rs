// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory stand-in for the portal, driven through [`Driver`].
//!
//! Models the login page, the read-only calculator form, its unlock
//! control, the save dialog with its project select, and the session
//! cookie. Locators come from `Locators::default()`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use super::driver::{Cookie, Driver, DriverError, DriverFuture, DriverResult, Locator};
use crate::config::{Locators, PortalConfig, Timeouts};

pub const PORTAL_URL: &str = "https://portal.test/qa-tracker/calculator";
pub const LOGIN: &str = "qa-bot";
pub const PASSWORD: &str = "s3cret";
const SESSION_COOKIE: &str = "portal_sid";

/// Portal config pointing at the fake, with short timeouts.
pub fn portal_config() -> PortalConfig {
    PortalConfig {
        url: PORTAL_URL.to_string(),
        webdriver_url: "http://localhost:4444".to_string(),
        headless: true,
        session_path: None,
        timeouts: Timeouts {
            login_ms: 200,
            step_ms: 100,
            confirm_ms: 60,
            platform_ms: 2_000,
            poll_ms: 5,
        },
        locators: Locators::default(),
    }
}

/// A saved form, as the portal would record it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub project: String,
    pub values: BTreeMap<String, String>,
}

pub struct FakePortal {
    locators: Locators,
    /// Project options offered in the save dialog: label → enabled.
    pub projects: BTreeMap<String, bool>,
    /// Projects whose save is accepted but never confirmed.
    pub unconfirmed: HashSet<String>,
    /// Projects whose save blocks for this long.
    pub slow_submit: HashMap<String, Duration>,
    /// Session cookie values the portal accepts.
    pub valid_sessions: HashSet<String>,
    /// Every committed save, in order.
    pub submissions: Vec<Submission>,
    /// Action log: `navigate <url>`, `click <locator>`, `fill ...`, `select ...`.
    pub actions: Vec<String>,
    pub quit: bool,
    /// Controls rendered disabled, keyed by locator text. Clicks on them
    /// are swallowed and typing into them fails, as in a browser.
    pub disabled: HashSet<String>,

    url: Option<String>,
    jar: Vec<Cookie>,
    logged_in: bool,
    typed_login: String,
    typed_password: String,
    form_enabled: bool,
    dialog_open: bool,
    selected: Option<String>,
    values: BTreeMap<String, String>,
    issued: usize,
}

impl FakePortal {
    pub fn new() -> Self {
        FakePortal {
            locators: Locators::default(),
            projects: BTreeMap::new(),
            unconfirmed: HashSet::new(),
            slow_submit: HashMap::new(),
            valid_sessions: HashSet::new(),
            submissions: Vec::new(),
            actions: Vec::new(),
            quit: false,
            disabled: HashSet::new(),
            url: None,
            jar: Vec::new(),
            logged_in: false,
            typed_login: String::new(),
            typed_password: String::new(),
            form_enabled: false,
            dialog_open: false,
            selected: None,
            values: BTreeMap::new(),
            issued: 0,
        }
    }

    /// Offer every project in the platform table, all enabled.
    pub fn with_all_projects() -> Self {
        let mut portal = FakePortal::new();
        for project in bt_core::PLATFORMS.targets() {
            portal.projects.insert(project.to_string(), true);
        }
        portal
    }

    /// Start already logged in, as after a restored session.
    pub fn logged_in(mut self) -> Self {
        self.logged_in = true;
        self
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// The latest committed save for `project`.
    pub fn last_submission(&self, project: &str) -> Option<&Submission> {
        self.submissions.iter().rev().find(|s| s.project == project)
    }

    pub fn count_actions(&self, prefix: &str) -> usize {
        self.actions.iter().filter(|a| a.starts_with(prefix)).count()
    }

    fn check_alive(&self) -> DriverResult<()> {
        if self.quit {
            Err(DriverError::NoSession)
        } else {
            Ok(())
        }
    }

    fn field_key(&self, locator: &Locator) -> Option<String> {
        self.locators
            .fields
            .iter()
            .find(|(_, l)| *l == locator)
            .map(|(k, _)| k.clone())
    }

    /// Render `locator` disabled.
    pub fn disable(mut self, locator: &Locator) -> Self {
        self.disabled.insert(locator.to_string());
        self
    }

    /// (displayed, enabled) of an element, or None when it is not on the page.
    fn element(&self, locator: &Locator) -> Option<(bool, bool)> {
        let (displayed, enabled) = self.rendered(locator)?;
        Some((displayed, enabled && !self.disabled.contains(&locator.to_string())))
    }

    fn rendered(&self, locator: &Locator) -> Option<(bool, bool)> {
        let l = &self.locators;
        if self.url.is_none() {
            return None;
        }
        if *locator == l.login_field || *locator == l.password_field || *locator == l.login_button {
            return (!self.logged_in).then_some((true, true));
        }
        if !self.logged_in {
            return None;
        }
        if *locator == l.logged_in_marker || *locator == l.unlock || *locator == l.save_link {
            return Some((true, true));
        }
        if *locator == l.editable_probe || self.field_key(locator).is_some() {
            return Some((true, self.form_enabled));
        }
        if *locator == l.project_select || *locator == l.submit || *locator == l.cancel {
            return self.dialog_open.then_some((true, true));
        }
        None
    }

    fn require(&self, locator: &Locator) -> DriverResult<(bool, bool)> {
        self.element(locator)
            .ok_or_else(|| DriverError::NoSuchElement(locator.to_string()))
    }

    fn has_valid_cookie(&self) -> bool {
        self.jar
            .iter()
            .any(|c| c.name == SESSION_COOKIE && self.valid_sessions.contains(&c.value))
    }

    fn load(&mut self, url: &str) {
        self.url = Some(url.to_string());
        self.form_enabled = false;
        self.dialog_open = false;
        self.selected = None;
        self.logged_in = self.logged_in || self.has_valid_cookie();
    }

    fn press(&mut self, locator: &Locator) -> DriverResult<()> {
        let l = self.locators.clone();
        if *locator == l.login_button {
            if self.typed_login == LOGIN && self.typed_password == PASSWORD {
                self.issued += 1;
                let sid = format!("session-{}", self.issued);
                self.valid_sessions.insert(sid.clone());
                self.jar.retain(|c| c.name != SESSION_COOKIE);
                self.jar.push(Cookie::new(SESSION_COOKIE, sid));
                self.logged_in = true;
            }
        } else if *locator == l.unlock {
            self.form_enabled = true;
        } else if *locator == l.save_link {
            self.dialog_open = self.form_enabled;
        } else if *locator == l.cancel {
            self.dialog_open = false;
            self.form_enabled = false;
        } else if *locator == l.submit {
            let Some(project) = self.selected.clone() else {
                return Err(DriverError::Command {
                    command: "click".to_string(),
                    message: "no project selected".to_string(),
                });
            };
            self.submissions.push(Submission {
                project: project.clone(),
                values: self.values.clone(),
            });
            if !self.unconfirmed.contains(&project) {
                self.dialog_open = false;
                self.form_enabled = false;
            }
        }
        Ok(())
    }
}

impl Default for FakePortal {
    fn default() -> Self {
        FakePortal::new()
    }
}

impl Driver for FakePortal {
    fn navigate<'a>(&'a mut self, url: &'a str) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            self.check_alive()?;
            self.actions.push(format!("navigate {}", url));
            self.load(url);
            Ok(())
        })
    }

    fn is_present<'a>(&'a mut self, locator: &'a Locator) -> DriverFuture<'a, bool> {
        Box::pin(async move {
            self.check_alive()?;
            Ok(self.element(locator).is_some())
        })
    }

    fn is_displayed<'a>(&'a mut self, locator: &'a Locator) -> DriverFuture<'a, bool> {
        Box::pin(async move {
            self.check_alive()?;
            Ok(self.require(locator)?.0)
        })
    }

    fn is_enabled<'a>(&'a mut self, locator: &'a Locator) -> DriverFuture<'a, bool> {
        Box::pin(async move {
            self.check_alive()?;
            Ok(self.require(locator)?.1)
        })
    }

    fn click<'a>(&'a mut self, locator: &'a Locator) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            self.check_alive()?;
            let (_, enabled) = self.require(locator)?;
            self.actions.push(format!("click {}", locator));
            if !enabled {
                return Ok(());
            }
            if *locator == self.locators.submit {
                let delay = self
                    .selected
                    .as_ref()
                    .and_then(|p| self.slow_submit.get(p).copied());
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
            }
            self.press(locator)
        })
    }

    fn fill<'a>(&'a mut self, locator: &'a Locator, text: &'a str) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            self.check_alive()?;
            let (_, enabled) = self.require(locator)?;
            if !enabled {
                return Err(DriverError::Command {
                    command: "fill".to_string(),
                    message: format!("{} is read-only", locator),
                });
            }
            self.actions.push(format!("fill {}", locator));
            if *locator == self.locators.login_field {
                self.typed_login = text.to_string();
            } else if *locator == self.locators.password_field {
                self.typed_password = text.to_string();
            } else if let Some(key) = self.field_key(locator) {
                self.values.insert(key, text.to_string());
            }
            Ok(())
        })
    }

    fn select_option<'a>(
        &'a mut self,
        locator: &'a Locator,
        option: &'a str,
    ) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            self.check_alive()?;
            self.require(locator)?;
            let unavailable = |reason: &str| DriverError::OptionUnavailable {
                locator: locator.to_string(),
                option: option.to_string(),
                reason: reason.to_string(),
            };
            match self.projects.get(option) {
                None => return Err(unavailable("not listed")),
                Some(false) => return Err(unavailable("disabled")),
                Some(true) => {}
            }
            self.actions.push(format!("select {}", option));
            self.selected = Some(option.to_string());
            Ok(())
        })
    }

    fn cookies(&mut self) -> DriverFuture<'_, Vec<Cookie>> {
        Box::pin(async move {
            self.check_alive()?;
            Ok(self.jar.clone())
        })
    }

    fn add_cookies<'a>(&'a mut self, cookies: &'a [Cookie]) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            self.check_alive()?;
            for cookie in cookies {
                self.jar.retain(|c| c.name != cookie.name);
                self.jar.push(cookie.clone());
            }
            Ok(())
        })
    }

    fn quit(&mut self) -> DriverFuture<'_, ()> {
        Box::pin(async move {
            self.check_alive()?;
            self.quit = true;
            Ok(())
        })
    }
}
