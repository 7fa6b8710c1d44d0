// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod fetch;
pub mod login;
pub mod mappings;
pub mod run;
pub mod schema;

use std::path::Path;

use crate::config::{resolve_config_path, Config, TrackerCredentials};
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::portal::{DriverResult, WebDriver};
use crate::tracker::{HttpTransport, TrackerClient};

/// Load and validate the config selected by `--config` or the environment.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = resolve_config_path(explicit);
    tracing::debug!(path = %path.display(), "loading config");
    Config::load(&path)
}

/// Pipeline over the real tracker, with credentials from the environment.
pub fn tracker_pipeline(config: &Config) -> Result<Pipeline<'_, HttpTransport>> {
    let credentials = TrackerCredentials::from_env()?;
    let client = TrackerClient::new(&config.tracker, &credentials)?;
    Ok(Pipeline::new(config, client))
}

/// Start a browser session on the configured WebDriver server.
pub async fn start_browser(config: &Config) -> DriverResult<WebDriver> {
    WebDriver::start(&config.portal.webdriver_url, config.portal.headless).await
}
