//! Store double that fails or loses the redemption race on demand.

use chrono::{DateTime, Utc};
use coupon_common::{CouponRecord, SerialNumber};

use super::{CouponStore, MarkUsed, StoreError, StoreResult};

/// Serves one seeded record; writes and pings can be made to fail
#[derive(Clone, Default)]
pub struct FaultyStore {
    record: Option<CouponRecord>,
    fail_reads: bool,
    fail_writes: bool,
    fail_ping: bool,
    mark_outcome: Option<MarkUsed>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record returned by every `get`
    pub fn with_record(mut self, record: CouponRecord) -> Self {
        self.record = Some(record);
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// `insert_if_absent` and `mark_used` return an error
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn failing_ping(mut self) -> Self {
        self.fail_ping = true;
        self
    }

    /// Reply `mark_used` gives regardless of what `get` returned
    pub fn marking(mut self, outcome: MarkUsed) -> Self {
        self.mark_outcome = Some(outcome);
        self
    }

    fn refused(op: &str) -> StoreError {
        StoreError::UnexpectedReply(format!("{} refused", op))
    }
}

impl CouponStore for FaultyStore {
    async fn get(&self, _serial: &SerialNumber) -> StoreResult<Option<CouponRecord>> {
        if self.fail_reads {
            return Err(Self::refused("GET"));
        }
        Ok(self.record.clone())
    }

    async fn insert_if_absent(
        &self,
        _serial: &SerialNumber,
        _record: &CouponRecord,
    ) -> StoreResult<bool> {
        if self.fail_writes {
            return Err(Self::refused("SET"));
        }
        Ok(true)
    }

    async fn mark_used(
        &self,
        _serial: &SerialNumber,
        used_at: DateTime<Utc>,
    ) -> StoreResult<MarkUsed> {
        if self.fail_writes {
            return Err(Self::refused("EVALSHA"));
        }
        if let Some(outcome) = &self.mark_outcome {
            return Ok(outcome.clone());
        }
        Ok(match &self.record {
            Some(record) => MarkUsed::Marked(CouponRecord {
                used_at: Some(used_at),
                ..record.clone()
            }),
            None => MarkUsed::Missing,
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        if self.fail_ping {
            return Err(Self::refused("PING"));
        }
        Ok(())
    }
}
