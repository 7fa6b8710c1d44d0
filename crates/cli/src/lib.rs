// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! btrs - bug tally and portal sync.
//!
//! Pulls bugs from the tracker through a saved filter, counts them per
//! platform and severity, and replays the counts into the QA portal's
//! calculator form one platform at a time.
//!
//! # Main Components
//!
//! - [`tracker`] - Tracker REST client (identity, filter, cursor pagination)
//! - [`portal`] - UI automation capability, WebDriver client, session agent
//! - [`sync`] - Per-platform form state machine with failure isolation
//! - [`pipeline`] - The end-to-end run and its [`RunSummary`](pipeline::RunSummary)
//! - [`Config`] - TOML configuration and environment credentials
//! - [`Error`] - Error types for all operations
//!
//! ```rust,ignore
//! use btrs::pipeline::{Pipeline, PortalAccess};
//! use btrs::tracker::TrackerClient;
//! use btrs::config::TrackerCredentials;
//!
//! let config = Config::load(Path::new("bugtally.toml"))?;
//! let client = TrackerClient::new(&config.tracker, &TrackerCredentials::from_env()?)?;
//! let summary = Pipeline::new(&config, client).run(None::<PortalAccess<_>>).await?;
//! ```

mod cli;
mod commands;
mod display;
mod schema;
pub mod timings;

pub mod config;
pub mod env;
pub mod error;
pub mod pipeline;
pub mod portal;
pub mod sync;
pub mod tracker;

pub use cli::{Cli, Command, OutputFormat, SchemaCommand};
pub use config::Config;
pub use error::{Error, Result};

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();
    match cli.command {
        Command::Run { dry_run, output } => commands::run::run(config, dry_run, output).await,
        Command::Fetch { output } => commands::fetch::run(config, output).await,
        Command::Login => commands::login::run(config).await,
        Command::Mappings => commands::mappings::run(),
        Command::Schema(cmd) => commands::schema::run(cmd),
    }
}
