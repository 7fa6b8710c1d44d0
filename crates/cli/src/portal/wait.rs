// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded polling on element state.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use super::driver::{Driver, DriverError, DriverResult, Locator};

/// Element state to wait for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Present,
    Visible,
    Enabled,
    /// Present and not accepting input.
    Disabled,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Condition::Present => "present",
            Condition::Visible => "visible",
            Condition::Enabled => "enabled",
            Condition::Disabled => "disabled",
        };
        write!(f, "{}", s)
    }
}

async fn holds<D: Driver + ?Sized>(
    driver: &mut D,
    locator: &Locator,
    condition: Condition,
) -> DriverResult<bool> {
    let checked = match condition {
        Condition::Present => driver.is_present(locator).await,
        Condition::Visible => driver.is_displayed(locator).await,
        Condition::Enabled => driver.is_enabled(locator).await,
        Condition::Disabled => driver.is_enabled(locator).await.map(|enabled| !enabled),
    };
    match checked {
        Err(e) if e.is_no_such_element() => Ok(false),
        other => other,
    }
}

/// Poll until `locator` satisfies `condition`, or fail with `WaitTimeout`.
///
/// The condition is checked at least once, even with a zero timeout. A
/// missing element counts as "not yet"; any other driver error ends the wait.
pub async fn wait_for<D: Driver + ?Sized>(
    driver: &mut D,
    locator: &Locator,
    condition: Condition,
    timeout: Duration,
    poll: Duration,
) -> DriverResult<()> {
    let started = Instant::now();
    loop {
        if holds(driver, locator, condition).await? {
            tracing::trace!(%locator, %condition, elapsed = ?started.elapsed(), "wait satisfied");
            return Ok(());
        }
        let elapsed = started.elapsed();
        if elapsed >= timeout {
            return Err(DriverError::WaitTimeout {
                locator: locator.to_string(),
                condition: condition.to_string(),
                waited: timeout,
            });
        }
        tokio::time::sleep(poll.min(timeout - elapsed)).await;
    }
}
