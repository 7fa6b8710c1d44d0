// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The UI-automation capability the portal code is written against.
//!
//! Everything is addressed by [`Locator`] rather than element handles, so a
//! stale handle can never outlive a page reload and test doubles only need
//! to model a map of locators.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a [`Locator`] finds an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Css,
    XPath,
}

impl Strategy {
    /// The W3C WebDriver `using` value.
    pub fn using(self) -> &'static str {
        match self {
            Strategy::Css => "css selector",
            Strategy::XPath => "xpath",
        }
    }
}

/// Where to find an element on the page.
///
/// Written in config as `css:<selector>` or `xpath:<expression>`; a string
/// without a prefix is a CSS selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locator {
    strategy: Strategy,
    value: String,
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator {
            strategy: Strategy::Css,
            value: selector.into(),
        }
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator {
            strategy: Strategy::XPath,
            value: expression.into(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strategy {
            Strategy::Css => write!(f, "css:{}", self.value),
            Strategy::XPath => write!(f, "xpath:{}", self.value),
        }
    }
}

impl FromStr for Locator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (strategy, value) = if let Some(rest) = s.strip_prefix("xpath:") {
            (Strategy::XPath, rest)
        } else if let Some(rest) = s.strip_prefix("css:") {
            (Strategy::Css, rest)
        } else {
            (Strategy::Css, s)
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("empty locator: '{}'", s));
        }
        Ok(Locator {
            strategy,
            value: value.to_string(),
        })
    }
}

impl TryFrom<String> for Locator {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Locator> for String {
    fn from(locator: Locator) -> Self {
        locator.to_string()
    }
}

/// A browser cookie, in the W3C WebDriver shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Cookie {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            secure: None,
            http_only: None,
            expiry: None,
            same_site: None,
        }
    }
}

/// Error type for driver operations.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// No element matches the locator right now.
    #[error("no element matches {0}")]
    NoSuchElement(String),

    /// A select control does not offer the option, or offers it disabled.
    #[error("option '{option}' unavailable in {locator}: {reason}")]
    OptionUnavailable {
        locator: String,
        option: String,
        reason: String,
    },

    /// A bounded wait ran out.
    #[error("timed out after {waited:?} waiting for {locator} to be {condition}")]
    WaitTimeout {
        locator: String,
        condition: String,
        waited: Duration,
    },

    /// The automation backend rejected a command.
    #[error("{command} failed: {message}")]
    Command { command: String, message: String },

    /// The automation backend could not be reached.
    #[error("cannot reach automation backend: {0}\n  hint: is a WebDriver server (chromedriver, geckodriver) running at portal.webdriver_url?")]
    Connection(String),

    /// The browser session is gone.
    #[error("no browser session")]
    NoSession,
}

impl DriverError {
    /// Returns true for the error a wait should treat as "not yet".
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, DriverError::NoSuchElement(_))
    }
}

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// Boxed future returned by [`Driver`] methods.
pub type DriverFuture<'a, T> = Pin<Box<dyn Future<Output = DriverResult<T>> + Send + 'a>>;

/// A single UI surface under exclusive control.
///
/// Methods take `&mut self`: one caller drives the surface at a time.
pub trait Driver: Send {
    /// Load `url` in the current window.
    fn navigate<'a>(&'a mut self, url: &'a str) -> DriverFuture<'a, ()>;

    /// Whether any element matches.
    fn is_present<'a>(&'a mut self, locator: &'a Locator) -> DriverFuture<'a, bool>;

    /// Whether the element is rendered. `NoSuchElement` when absent.
    fn is_displayed<'a>(&'a mut self, locator: &'a Locator) -> DriverFuture<'a, bool>;

    /// Whether the element accepts input. `NoSuchElement` when absent.
    fn is_enabled<'a>(&'a mut self, locator: &'a Locator) -> DriverFuture<'a, bool>;

    fn click<'a>(&'a mut self, locator: &'a Locator) -> DriverFuture<'a, ()>;

    /// Clear the element and type `text` into it.
    fn fill<'a>(&'a mut self, locator: &'a Locator, text: &'a str) -> DriverFuture<'a, ()>;

    /// Choose the option labelled `option` in a select control.
    ///
    /// Fails with `OptionUnavailable` when the option is missing or disabled
    /// rather than leaving the previous choice in place.
    fn select_option<'a>(
        &'a mut self,
        locator: &'a Locator,
        option: &'a str,
    ) -> DriverFuture<'a, ()>;

    /// Cookies visible to the current page.
    fn cookies(&mut self) -> DriverFuture<'_, Vec<Cookie>>;

    /// Add cookies for the current page's domain.
    fn add_cookies<'a>(&'a mut self, cookies: &'a [Cookie]) -> DriverFuture<'a, ()>;

    /// End the browser session. Further calls fail with `NoSession`.
    fn quit(&mut self) -> DriverFuture<'_, ()>;
}
