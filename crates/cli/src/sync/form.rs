// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Page object for the portal's calculator form.
//!
//! Each step maps driver failures onto the [`SyncStage`] it belongs to.

use std::collections::BTreeMap;

use crate::config::PortalConfig;
use crate::portal::{wait_for, Condition, Driver, DriverError, Locator};

use super::outcome::{SyncError, SyncStage};

pub struct PortalForm<'c> {
    portal: &'c PortalConfig,
}

impl<'c> PortalForm<'c> {
    pub fn new(portal: &'c PortalConfig) -> Self {
        PortalForm { portal }
    }

    /// Unlock the form and wait until it accepts input.
    pub async fn enable<D: Driver + ?Sized>(&self, driver: &mut D) -> Result<(), SyncError> {
        let locators = &self.portal.locators;
        let timeouts = &self.portal.timeouts;
        let fail = |e: DriverError| SyncError::new(SyncStage::Enable, e.to_string());

        self.press(driver, &locators.unlock, SyncStage::Enable).await?;
        wait_for(
            driver,
            &locators.editable_probe,
            Condition::Enabled,
            timeouts.step(),
            timeouts.poll(),
        )
        .await
        .map_err(fail)
    }

    /// Clear and write every field in `values`.
    pub async fn fill<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        values: &BTreeMap<String, u64>,
    ) -> Result<(), SyncError> {
        for (field, value) in values {
            let locator = self.portal.locators.fields.get(field).ok_or_else(|| {
                SyncError::new(
                    SyncStage::Fill,
                    format!("no locator configured for field '{}'", field),
                )
            })?;
            driver
                .fill(locator, &value.to_string())
                .await
                .map_err(|e| SyncError::new(SyncStage::Fill, format!("{}: {}", field, e)))?;
        }
        Ok(())
    }

    /// Open the save dialog and wait for its project selector.
    pub async fn open_save_dialog<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
    ) -> Result<(), SyncError> {
        let locators = &self.portal.locators;
        let timeouts = &self.portal.timeouts;
        let fail = |e: DriverError| SyncError::new(SyncStage::Submit, e.to_string());

        self.press(driver, &locators.save_link, SyncStage::Submit).await?;
        wait_for(
            driver,
            &locators.project_select,
            Condition::Visible,
            timeouts.step(),
            timeouts.poll(),
        )
        .await
        .map_err(fail)
    }

    /// Choose the destination project. A missing or disabled option fails.
    pub async fn select_project<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        project: &str,
    ) -> Result<(), SyncError> {
        driver
            .select_option(&self.portal.locators.project_select, project)
            .await
            .map_err(|e| SyncError::new(SyncStage::Select, e.to_string()))
    }

    pub async fn submit<D: Driver + ?Sized>(&self, driver: &mut D) -> Result<(), SyncError> {
        self.press(driver, &self.portal.locators.submit, SyncStage::Submit).await
    }

    /// Wait for the form to fall back to read-only, which is how the portal
    /// acknowledges a save.
    pub async fn await_confirmation<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
    ) -> Result<(), SyncError> {
        let timeouts = &self.portal.timeouts;
        wait_for(
            driver,
            &self.portal.locators.editable_probe,
            Condition::Disabled,
            timeouts.confirm(),
            timeouts.poll(),
        )
        .await
        .map_err(|e| match e {
            DriverError::WaitTimeout { waited, .. } => SyncError::new(
                SyncStage::Confirm,
                format!("unconfirmed: portal did not acknowledge the save within {:?}", waited),
            ),
            other => SyncError::new(SyncStage::Confirm, other.to_string()),
        })
    }

    /// Click `control` once it accepts input. A control that stays disabled
    /// fails at `stage` instead of taking a click that does nothing.
    async fn press<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        control: &Locator,
        stage: SyncStage,
    ) -> Result<(), SyncError> {
        let timeouts = &self.portal.timeouts;
        wait_for(
            driver,
            control,
            Condition::Enabled,
            timeouts.step(),
            timeouts.poll(),
        )
        .await
        .map_err(|e| SyncError::new(stage, e.to_string()))?;
        driver
            .click(control)
            .await
            .map_err(|e| SyncError::new(stage, e.to_string()))
    }

    /// Best-effort return to a clean read-only form. Errors are only logged.
    pub async fn recover<D: Driver + ?Sized>(&self, driver: &mut D) {
        let cancel = &self.portal.locators.cancel;
        match driver.is_present(cancel).await {
            Ok(true) => {
                if let Err(e) = driver.click(cancel).await {
                    tracing::debug!(error = %e, "cancel during recovery failed");
                }
            }
            Ok(false) => {}
            Err(e) => tracing::debug!(error = %e, "cancel lookup during recovery failed"),
        }
        if let Err(e) = driver.navigate(&self.portal.url).await {
            tracing::warn!(error = %e, "reload during recovery failed");
        }
    }
}
