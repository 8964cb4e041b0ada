//! Core types shared across Coupon Vault components.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::constants::{PASS_CODE_LEN, SERIAL_NUMBER_LEN, USAGE_COUNT_MAX_DIGITS};
use crate::error::CouponError;

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Twelve-digit coupon identifier, also the store key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerialNumber(String);

impl SerialNumber {
    /// Validate a client-supplied serial number
    pub fn parse(raw: &str) -> Result<Self, CouponError> {
        if is_digits(raw, SERIAL_NUMBER_LEN) {
            Ok(Self(raw.to_string()))
        } else {
            Err(CouponError::InvalidSerialNumber)
        }
    }

    /// Build from twelve decimal digits (each taken modulo 10)
    pub fn from_digits(digits: [u8; SERIAL_NUMBER_LEN]) -> Self {
        Self(digits.iter().map(|d| char::from(b'0' + d % 10)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Five-digit redemption secret. Never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct PassCode(String);

impl PassCode {
    pub fn parse(raw: &str) -> Result<Self, CouponError> {
        if is_digits(raw, PASS_CODE_LEN) {
            Ok(Self(raw.to_string()))
        } else {
            Err(CouponError::InvalidPassCode)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PassCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PassCode(*****)")
    }
}

/// Parse a usage count: 1 to 5 ASCII digits, not zero
pub fn parse_usage_count(raw: &str) -> Result<u32, CouponError> {
    if raw.is_empty()
        || raw.len() > USAGE_COUNT_MAX_DIGITS
        || !raw.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(CouponError::InvalidNumber);
    }

    match raw.parse::<u32>() {
        Ok(0) | Err(_) => Err(CouponError::InvalidNumber),
        Ok(n) => Ok(n),
    }
}

/// Lifecycle state of a coupon, evaluated at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponStatus {
    /// Not yet used and not past its expiry
    Active,
    /// Not used, but the expiry has passed (expiry is never enforced by deletion)
    Expired,
    /// Used; terminal
    Redeemed,
}

/// Value stored under a coupon's serial number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRecord {
    /// Serial number followed by the hex SHA-256 of `"{passCode}:{salt}"`
    pub hash: String,

    /// Expiry (Unix epoch milliseconds); serialized as `null` when unset
    #[serde(default)]
    pub expired_at: Option<i64>,

    /// Usage count shown on redemption
    #[serde(deserialize_with = "usage_count_from_json")]
    pub number: u32,

    /// Redemption timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
}

impl CouponRecord {
    pub fn new(hash: String, number: u32, expired_at: Option<i64>) -> Self {
        Self {
            hash,
            expired_at,
            number,
            used_at: None,
        }
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    /// Status at `now`; a used coupon reports `Redeemed` even if also expired
    pub fn status_at(&self, now: DateTime<Utc>) -> CouponStatus {
        if self.is_used() {
            return CouponStatus::Redeemed;
        }
        match self.expired_at {
            Some(expires) if now.timestamp_millis() > expires => CouponStatus::Expired,
            _ => CouponStatus::Active,
        }
    }
}

/// Older records hold whatever the client sent: `5` or `"5"`
fn usage_count_from_json<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
