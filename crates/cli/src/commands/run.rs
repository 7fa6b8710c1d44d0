// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::cli::OutputFormat;
use crate::config::PortalCredentials;
use crate::display::format_summary;
use crate::error::Result;
use crate::pipeline::PortalAccess;

use super::{load_config, start_browser, tracker_pipeline};

/// Run the full pipeline and print its summary.
///
/// Returns `PartialSync` after printing when any platform failed.
pub async fn run(config_path: Option<&Path>, dry_run: bool, output: OutputFormat) -> Result<()> {
    let config = load_config(config_path)?;
    let pipeline = tracker_pipeline(&config)?;

    let portal = if dry_run {
        None
    } else {
        Some(PortalAccess {
            credentials: PortalCredentials::from_env()?,
            start_driver: || start_browser(&config),
        })
    };

    let summary = pipeline.run(portal).await?;
    match output {
        OutputFormat::Text => print!("{}", format_summary(&summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    summary.check()
}
