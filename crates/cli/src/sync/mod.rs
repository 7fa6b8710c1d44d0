// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync of planned counts into the portal form.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ SyncOrchestrator │────►│ PortalForm  │────►│   Driver    │
//! │ (state machine,  │     │ (page obj.) │     │   (trait)   │
//! │  deadlines)      │     └─────────────┘     └─────────────┘
//! └──────────────────┘
//!          │
//!          ▼
//!     SyncReport (one SyncOutcome per platform)
//! ```
//!
//! - Failure isolation: one platform's failure never stops the next
//! - Per-platform deadline on top of every bounded wait
//! - Cross-process exclusivity through [`RunLock`]

mod form;
mod lock;
mod orchestrator;
mod outcome;

pub use form::PortalForm;
pub use lock::RunLock;
pub use orchestrator::{FormState, SyncOrchestrator};
pub use outcome::{SyncError, SyncOutcome, SyncReport, SyncStage};



#[cfg(test)]
mod orchestrator_tests;
