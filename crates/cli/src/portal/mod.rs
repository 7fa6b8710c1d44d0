// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Portal automation: the driver capability, bounded waits, and sessions.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ SessionAgent │────►│   Driver    │────►│  WebDriver  │────► browser
//! │ SyncOrchestr.│◄────│   (trait)   │◄────│  (W3C HTTP) │
//! └──────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//!   session artifact (JSON cookies, last write wins)
//! ```
//!
//! Every suspension point goes through [`wait_for`], so nothing waits
//! without a bound.

mod driver;
mod session;
mod wait;
mod webdriver;

pub use driver::{
    Cookie, Driver, DriverError, DriverFuture, DriverResult, Locator, Strategy,
};
pub use session::{origin_of, Session, SessionAgent, SessionState};
pub use wait::{wait_for, Condition};
pub use webdriver::WebDriver;

#[cfg(test)]
pub(crate) mod test_helpers;
