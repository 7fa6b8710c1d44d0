// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::config::PortalCredentials;
use crate::error::Result;
use crate::portal::{Driver, SessionAgent};
use crate::sync::RunLock;

use super::{load_config, start_browser};

/// Log in to the portal and persist the session artifact.
pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let credentials = PortalCredentials::from_env()?;
    let session_path = config.session_path();
    let _lock = RunLock::acquire(&RunLock::path_for(&session_path))?;

    let agent = SessionAgent::new(config.portal.clone(), session_path);
    let mut driver = start_browser(&config).await?;
    let result = agent.login(&mut driver, &credentials).await;
    if let Err(e) = driver.quit().await {
        tracing::debug!(error = %e, "browser quit failed");
    }

    let session = result?;
    agent.persist(&session)?;
    println!("Session stored at {}", agent.path().display());
    Ok(())
}
