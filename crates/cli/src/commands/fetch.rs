// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::cli::OutputFormat;
use crate::display::format_counts;
use crate::error::Result;
use crate::schema::CountsOutputJson;

use super::{load_config, tracker_pipeline};

/// Fetch and count without touching the portal.
pub async fn run(config_path: Option<&Path>, output: OutputFormat) -> Result<()> {
    let config = load_config(config_path)?;
    let retrieval = tracker_pipeline(&config)?.retrieve().await?;

    match output {
        OutputFormat::Text => {
            if let Some(warning) = &retrieval.fetch.warning {
                eprintln!("warning: {}", warning);
            }
            print!("{}", format_counts(&retrieval.counts));
        }
        OutputFormat::Json => {
            let json = CountsOutputJson::new(&config.tracker.filter_id, retrieval);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}
