// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const QUICKSTART_HELP: &str = "\
Get started:
  bugtally mappings            Show tracker → portal category tables
  bugtally fetch               Count bugs from the configured filter
  bugtally run --dry-run       Count and plan without touching the portal
  bugtally run                 Count and sync into the portal

Environment:
  JIRA_EMAIL, JIRA_API_TOKEN   Tracker credentials
  QATRACKER_LOGIN/PASSWORD     Portal credentials
  JIRA_BASE_URL                Overrides tracker.base_url
  RUST_LOG                     Log filter (default: info)";

#[derive(Parser, Debug)]
#[command(name = "bugtally")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tally tracker bugs by platform and severity and sync them into the QA portal")]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Config file (default: $BUGTALLY_CONFIG, then ./bugtally.toml)
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Count bugs and sync the counts into the portal
    #[command(after_help = "Examples:\n  \
        bugtally run                   Full run: fetch, count, sync\n  \
        bugtally run --dry-run         Fetch and plan only\n  \
        bugtally run -o json           Machine-readable summary")]
    Run {
        /// Fetch and plan, but do not touch the portal
        #[arg(long)]
        dry_run: bool,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Fetch bugs from the configured filter and print the count table
    Fetch {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Log in to the portal and store the session for later runs
    Login,

    /// Print the platform and severity mapping tables
    Mappings,

    /// Output JSON Schema for commands with JSON output
    #[command(
        subcommand,
        arg_required_else_help = true,
        after_help = "Examples:\n  \
            bugtally schema summary   Output schema for 'bugtally run -o json'\n  \
            bugtally schema counts    Output schema for 'bugtally fetch -o json'"
    )]
    Schema(SchemaCommand),
}

/// Schema output commands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaCommand {
    /// Output JSON Schema for 'bugtally run' JSON output
    Summary,
    /// Output JSON Schema for 'bugtally fetch' JSON output
    Counts,
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
