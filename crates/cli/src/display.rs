// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text rendering for command output.

use std::collections::BTreeSet;

use bt_core::{CountTable, LookupTable, PLATFORMS, SEVERITIES};

use crate::pipeline::RunSummary;

/// Severity columns: declared severities first, then any others seen.
fn severity_columns(table: &CountTable) -> Vec<String> {
    let mut columns: Vec<String> = SEVERITIES.entries().map(|(s, _)| s.to_string()).collect();
    let extra: BTreeSet<&str> = table
        .rows()
        .flat_map(|(_, row)| row.keys().map(String::as_str))
        .filter(|s| !SEVERITIES.entries().any(|(declared, _)| declared == *s))
        .collect();
    columns.extend(extra.into_iter().map(str::to_string));
    columns
}

/// Platform × severity grid with a total column.
pub fn format_counts(table: &CountTable) -> String {
    if table.is_empty() {
        return "No issues.\n".to_string();
    }
    let columns = severity_columns(table);
    let name_width = table
        .platforms()
        .map(str::len)
        .chain(["Platform".len()])
        .max()
        .unwrap_or(8);
    let widths: Vec<usize> = columns.iter().map(|c| c.len().max(3)).collect();

    let mut header = format!("{:<name_width$}", "Platform");
    for (column, width) in columns.iter().zip(&widths) {
        header.push_str(&format!("  {:>width$}", column));
    }
    header.push_str(&format!("  {:>5}", "Total"));

    let mut lines = vec![header];
    for platform in table.platforms() {
        let mut line = format!("{:<name_width$}", platform);
        for (column, width) in columns.iter().zip(&widths) {
            line.push_str(&format!("  {:>width$}", table.get(platform, column)));
        }
        line.push_str(&format!("  {:>5}", table.platform_total(platform)));
        lines.push(line);
    }
    finish(lines)
}

fn format_table(title: &str, table: &LookupTable) -> Vec<String> {
    let width = table.entries().map(|(s, _)| s.len()).max().unwrap_or(0);
    let mut lines = vec![format!("{}:", title)];
    for (source, target) in table.entries() {
        lines.push(format!("  {:<width$}  → {}", source, target));
    }
    lines
}

/// Both mapping tables in declared order.
pub fn format_mappings() -> String {
    let mut lines = format_table("Platforms (tracker → portal project)", &PLATFORMS);
    lines.push(String::new());
    lines.extend(format_table(
        "Severities (tracker priority → portal field)",
        &SEVERITIES,
    ));
    finish(lines)
}

/// Human-readable run summary.
pub fn format_summary(summary: &RunSummary) -> String {
    let mut lines = vec![
        format!("Filter {}: {}", summary.filter_id, summary.query),
        format!("Fetched {} issue(s)", summary.issues_fetched),
    ];
    if let Some(warning) = &summary.warning {
        lines.push(format!("warning: {}", warning));
    }
    lines.push(String::new());
    let mut out = finish(lines);
    out.push_str(&format_counts(&summary.counts));

    let mut lines = Vec::new();
    if summary.dry_run {
        lines.push(String::new());
        lines.push("Dry run: portal not touched. Planned values:".to_string());
        for plan in &summary.plan.platforms {
            let values: Vec<String> = plan
                .values
                .iter()
                .map(|(field, count)| format!("{}={}", field, count))
                .collect();
            lines.push(format!(
                "  {} ({}): {}",
                plan.platform,
                plan.project,
                values.join(" ")
            ));
        }
        out.push_str(&finish(lines));
        return out;
    }

    if let Some(error) = &summary.sync_error {
        lines.push(String::new());
        lines.push(format!("Sync not performed: {}", error));
        out.push_str(&finish(lines));
        return out;
    }

    let report = &summary.outcomes;
    let synced: Vec<&str> = report.succeeded().map(|o| o.platform()).collect();
    lines.push(String::new());
    lines.push(format!("Synced ({}): {}", synced.len(), list_or_none(&synced)));

    let aborted: Vec<_> = report.aborted().collect();
    if aborted.is_empty() {
        lines.push("Aborted (0): none".to_string());
    } else {
        lines.push(format!("Aborted ({}):", aborted.len()));
    }
    for outcome in aborted {
        let stage = outcome.stage().map(|s| s.to_string()).unwrap_or_default();
        lines.push(format!(
            "  {} at {}: {}",
            outcome.platform(),
            stage,
            outcome.reason().unwrap_or("")
        ));
    }

    let skipped: Vec<&str> = report.skipped().map(|o| o.platform()).collect();
    if !skipped.is_empty() {
        lines.push(format!("Skipped ({}): {}", skipped.len(), skipped.join(", ")));
    }
    if summary.partial {
        lines.push("Counts may be partial: the tracker ended pagination early.".to_string());
    }
    out.push_str(&finish(lines));
    out
}

/// Joins lines, each terminated by a newline.
fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    if !lines.is_empty() {
        out.push('\n');
    }
    out
}

fn list_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
