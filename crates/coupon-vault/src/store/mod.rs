//! Coupon persistence.
//!
//! Both backends expose atomic conditional writes so that issuance never
//! overwrites an existing serial number and a coupon can be marked used once.

mod memory;
mod redis_store;
#[cfg(test)]
mod faulty;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;
#[cfg(test)]
pub use faulty::FaultyStore;

use chrono::{DateTime, Utc};
use coupon_common::{CouponRecord, SerialNumber};
use thiserror::Error;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Redis connection/operation error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Stored value is not a valid coupon record
    #[error("Corrupt record: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Backend returned a reply the store does not understand
    #[error("Unexpected reply: {0}")]
    UnexpectedReply(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of the compare-and-set that redeems a coupon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkUsed {
    /// `usedAt` was absent and is now set; carries the updated record
    Marked(CouponRecord),
    /// Another redemption got there first
    AlreadyUsed,
    /// No record under the serial number
    Missing,
}

/// Coupon store trait
///
/// Callers use the `Send` variant `CouponStore`; the local trait only exists
/// as its source.
#[trait_variant::make(CouponStore: Send)]
#[allow(dead_code)]
pub trait LocalCouponStore {
    /// Fetch a record by serial number
    async fn get(&self, serial: &SerialNumber) -> StoreResult<Option<CouponRecord>>;

    /// Store a record only if the serial number is unused.
    /// Returns false on collision.
    async fn insert_if_absent(
        &self,
        serial: &SerialNumber,
        record: &CouponRecord,
    ) -> StoreResult<bool>;

    /// Set `usedAt` only if it is still absent, keeping every other field
    async fn mark_used(
        &self,
        serial: &SerialNumber,
        used_at: DateTime<Utc>,
    ) -> StoreResult<MarkUsed>;

    /// Readiness probe
    async fn ping(&self) -> StoreResult<()>;
}
