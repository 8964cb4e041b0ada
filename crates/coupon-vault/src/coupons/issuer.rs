//! Coupon issuance.

use coupon_common::{CouponError, CouponRecord, SerialNumber};
use std::sync::Arc;

use super::hasher::PassCodeHasher;
use super::request::IssueCommand;
use super::serial::generate_serial_number;
use crate::store::CouponStore;

/// Coupon issuer service
pub struct CouponIssuer {
    hasher: Arc<PassCodeHasher>,
    /// Serial number candidates tried per issuance
    max_attempts: u32,
}

impl CouponIssuer {
    pub fn new(hasher: Arc<PassCodeHasher>, max_attempts: u32) -> Self {
        Self {
            hasher,
            max_attempts,
        }
    }

    /// Issue a coupon under a fresh random serial number
    pub async fn issue<S>(&self, store: &S, cmd: &IssueCommand) -> Result<SerialNumber, CouponError>
    where
        S: CouponStore + Sync,
    {
        self.issue_with(store, cmd, || generate_serial_number(&mut rand::rng()))
            .await
    }

    /// Issue a coupon, drawing candidates from `next_serial` until one is free
    pub async fn issue_with<S, F>(
        &self,
        store: &S,
        cmd: &IssueCommand,
        mut next_serial: F,
    ) -> Result<SerialNumber, CouponError>
    where
        S: CouponStore + Sync,
        F: FnMut() -> SerialNumber,
    {
        for attempt in 1..=self.max_attempts {
            let serial = next_serial();
            let record = CouponRecord::new(
                self.hasher.hash(&serial, &cmd.pass_code),
                cmd.number,
                cmd.expired_at,
            );

            let inserted = store
                .insert_if_absent(&serial, &record)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, serial_number = %serial, "Failed to store coupon");
                    CouponError::IssueFailed(e.to_string())
                })?;

            if inserted {
                tracing::info!(
                    serial_number = %serial,
                    number = cmd.number,
                    expired_at = ?cmd.expired_at,
                    attempt,
                    "Coupon issued"
                );
                return Ok(serial);
            }

            tracing::debug!(serial_number = %serial, attempt, "Serial number taken, drawing again");
        }

        tracing::warn!(attempts = self.max_attempts, "No free serial number found");
        Err(CouponError::IssueFailed(format!(
            "no free serial number after {} attempts",
            self.max_attempts
        )))
    }
}
