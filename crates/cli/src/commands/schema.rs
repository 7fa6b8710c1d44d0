// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Schema command implementation.
//!
//! Outputs JSON Schema specifications for commands that support JSON output.

use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::cli::SchemaCommand;
use crate::error::Result;
use crate::pipeline::RunSummary;
use crate::schema::CountsOutputJson;

/// Schema for the JSON output selected by `cmd`.
pub fn schema(cmd: SchemaCommand) -> RootSchema {
    match cmd {
        SchemaCommand::Summary => schema_for!(RunSummary),
        SchemaCommand::Counts => schema_for!(CountsOutputJson),
    }
}

/// Run the schema command.
pub fn run(cmd: SchemaCommand) -> Result<()> {
    let json = serde_json::to_string_pretty(&schema(cmd))?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
