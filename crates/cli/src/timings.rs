// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-phase wall clock for a run (tracker round trips, aggregation,
//! portal session, form sync).
//!
//! `BUGTALLY_TIMINGS=1` prints `[timings] <phase> <ms>ms` lines to stderr.
//! Phases are always emitted as `debug` events so `-v` shows them too.

use std::time::{Duration, Instant};

/// Report how long `phase` took since `start`.
pub fn record(phase: &str, start: Instant) -> Duration {
    let elapsed = start.elapsed();
    tracing::debug!(phase, elapsed_ms = elapsed.as_millis() as u64, "phase finished");
    if crate::env::timings() {
        eprintln!("[timings] {} {}ms", phase, elapsed.as_millis());
    }
    elapsed
}

/// Time a block, `.await`s included, and evaluate to the block's value.
///
/// ```rust,ignore
/// let fetch = time_phase!("tracker::fetch", {
///     client.fetch_all(&query, &fields).await?
/// });
/// ```
#[macro_export]
macro_rules! time_phase {
    ($phase:expr, $block:expr) => {{
        let __start = std::time::Instant::now();
        let __value = $block;
        $crate::timings::record($phase, __start);
        __value
    }};
}
