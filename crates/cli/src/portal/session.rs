// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Portal login and the persisted session artifact.
//!
//! The artifact holds the portal cookies so later runs can skip the login
//! form. It is credential-equivalent: written owner-only where the platform
//! allows, and never logged.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::driver::{Cookie, Driver, DriverError};
use super::wait::{wait_for, Condition};
use crate::config::{PortalConfig, PortalCredentials};
use crate::error::{Error, Result};

/// An authenticated portal session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Scheme and authority the cookies belong to.
    pub origin: String,
    pub cookies: Vec<Cookie>,
    pub established_at: DateTime<Utc>,
}

/// Result of checking a restored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Valid,
    Expired,
}

/// Logs in to the portal and manages the session artifact.
pub struct SessionAgent {
    portal: PortalConfig,
    path: PathBuf,
}

impl SessionAgent {
    pub fn new(portal: PortalConfig, path: PathBuf) -> Self {
        SessionAgent { portal, path }
    }

    /// Where the artifact lives.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fill the login form and wait for the logged-in marker.
    pub async fn login<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        credentials: &PortalCredentials,
    ) -> Result<Session> {
        let locators = &self.portal.locators;
        let timeouts = &self.portal.timeouts;

        driver.navigate(&self.portal.url).await?;
        wait_for(
            driver,
            &locators.login_field,
            Condition::Visible,
            timeouts.login(),
            timeouts.poll(),
        )
        .await
        .map_err(|e| Error::Login(format!("login form did not appear: {}", e)))?;

        let origin = origin_of(&self.portal.url)?;
        driver
            .fill(&locators.login_field, &credentials.login)
            .await
            .map_err(|e| Error::Login(format!("could not enter login: {}", e)))?;
        wait_for(
            driver,
            &locators.password_field,
            Condition::Visible,
            timeouts.step(),
            timeouts.poll(),
        )
        .await
        .map_err(|e| Error::Login(format!("password field did not appear: {}", e)))?;
        driver
            .fill(&locators.password_field, &credentials.password)
            .await
            .map_err(|e| Error::Login(format!("could not enter password: {}", e)))?;
        driver
            .click(&locators.login_button)
            .await
            .map_err(|e| Error::Login(format!("could not submit login form: {}", e)))?;

        match wait_for(
            driver,
            &locators.logged_in_marker,
            Condition::Visible,
            timeouts.login(),
            timeouts.poll(),
        )
        .await
        {
            Ok(()) => {}
            Err(DriverError::WaitTimeout { waited, .. }) => {
                return Err(Error::Login(format!(
                    "not logged in after {:?}; credentials rejected or portal slow",
                    waited
                )))
            }
            Err(e) => return Err(e.into()),
        }

        let cookies = driver.cookies().await?;
        tracing::info!(cookies = cookies.len(), "portal login succeeded");
        Ok(Session {
            origin,
            cookies,
            established_at: Utc::now(),
        })
    }

    /// Write the artifact, replacing any previous one.
    pub fn persist(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(session)?;
        let tmp = temp_path(&self.path);
        match fs::remove_file(&tmp) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        let mut file = owner_only().write(true).create_new(true).open(&tmp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "session persisted");
        Ok(())
    }

    /// Read the artifact, if one exists.
    pub fn load(&self) -> Result<Option<Session>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map(Some).map_err(|e| {
            Error::Session(format!("unreadable session artifact {}: {}", self.path.display(), e))
        })
    }

    /// Inject a stored session and check the portal still accepts it.
    pub async fn restore<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        session: &Session,
    ) -> Result<SessionState> {
        let locators = &self.portal.locators;
        let timeouts = &self.portal.timeouts;

        driver.navigate(&session.origin).await?;
        driver.add_cookies(&session.cookies).await?;
        driver.navigate(&self.portal.url).await?;

        match wait_for(
            driver,
            &locators.logged_in_marker,
            Condition::Visible,
            timeouts.step(),
            timeouts.poll(),
        )
        .await
        {
            Ok(()) => Ok(SessionState::Valid),
            Err(DriverError::WaitTimeout { .. }) => Ok(SessionState::Expired),
            Err(e) => Err(e.into()),
        }
    }

    /// Reuse the stored session when it is still valid, otherwise log in
    /// and persist a fresh one.
    pub async fn establish<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        credentials: &PortalCredentials,
    ) -> Result<Session> {
        let stored = match self.load() {
            Ok(stored) => stored,
            Err(Error::Session(reason)) => {
                tracing::warn!("{}; logging in again", reason);
                None
            }
            Err(e) => return Err(e),
        };

        if let Some(session) = stored {
            if session.origin == origin_of(&self.portal.url)? {
                match self.restore(driver, &session).await? {
                    SessionState::Valid => {
                        tracing::info!(established_at = %session.established_at, "portal session restored");
                        return Ok(session);
                    }
                    SessionState::Expired => tracing::info!("stored portal session expired"),
                }
            } else {
                tracing::info!("stored portal session belongs to another origin");
            }
        }

        let session = self.login(driver, credentials).await?;
        self.persist(&session)?;
        Ok(session)
    }
}

/// Serialized origin (`scheme://host[:port]`) of `url`.
///
/// Userinfo, path and query are dropped and default ports are omitted, so
/// the value is stable across spellings of the same portal address.
pub fn origin_of(url: &str) -> Result<String> {
    let parsed = Url::parse(url)
        .map_err(|e| Error::Config(format!("invalid portal url '{}': {}", url, e)))?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return Err(Error::Config(format!("portal url '{}' has no origin", url)));
    }
    Ok(origin.ascii_serialization())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(unix)]
fn owner_only() -> fs::OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;
    let mut options = fs::OpenOptions::new();
    options.mode(0o600);
    options
}

#[cfg(not(unix))]
fn owner_only() -> fs::OpenOptions {
    fs::OpenOptions::new()
}
