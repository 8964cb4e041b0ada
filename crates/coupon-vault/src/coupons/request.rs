//! Request bodies and their validation.
//!
//! Fields arrive as loose JSON (clients send numbers or strings
//! interchangeably) and are checked in a fixed order; the first failure wins.

use chrono::{NaiveDate, NaiveTime};
use coupon_common::constants::EXPIRY_DATE_LEN;
use coupon_common::{CouponError, PassCode, SerialNumber, parse_usage_count};
use serde::Deserialize;
use serde_json::Value;

/// `POST /coupons` body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponRequest {
    #[serde(default)]
    pub number: Option<Value>,
    #[serde(default)]
    pub expired_at: Option<Value>,
    #[serde(default)]
    pub pass_code: Option<Value>,
}

/// `PUT /coupons` body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemCouponRequest {
    #[serde(default)]
    pub serial_number: Option<Value>,
    #[serde(default)]
    pub pass_code: Option<Value>,
}

/// A validated issuance
#[derive(Debug, Clone)]
pub struct IssueCommand {
    pub number: u32,
    /// Midnight UTC of the requested date, in epoch milliseconds
    pub expired_at: Option<i64>,
    pub pass_code: PassCode,
}

/// A validated redemption
#[derive(Debug, Clone)]
pub struct RedeemCommand {
    pub serial_number: SerialNumber,
    pub pass_code: PassCode,
}

/// Text form of a scalar field; `null` and `""` count as absent.
/// Any other value keeps its JSON spelling, so `0`, `false` and `5.0` reach
/// the field's format check as `"0"`, `"false"` and `"5.0"` and fail it.
fn text(field: &Option<Value>) -> Option<String> {
    match field {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// `YYYY-MM-DD` to epoch milliseconds at midnight UTC
pub fn parse_expiry_date(raw: &str) -> Result<i64, CouponError> {
    let shaped = raw.len() == EXPIRY_DATE_LEN
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(CouponError::InvalidExpiry);
    }

    let date =
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| CouponError::InvalidExpiry)?;
    Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
}

impl CreateCouponRequest {
    pub fn validate(&self) -> Result<IssueCommand, CouponError> {
        let number = text(&self.number)
            .ok_or(CouponError::InvalidNumber)
            .and_then(|raw| parse_usage_count(&raw))?;

        let expired_at = text(&self.expired_at)
            .map(|raw| parse_expiry_date(&raw))
            .transpose()?;

        let pass_code = text(&self.pass_code)
            .ok_or(CouponError::InvalidPassCode)
            .and_then(|raw| PassCode::parse(&raw))?;

        Ok(IssueCommand {
            number,
            expired_at,
            pass_code,
        })
    }
}

impl RedeemCouponRequest {
    pub fn validate(&self) -> Result<RedeemCommand, CouponError> {
        let serial_number = text(&self.serial_number)
            .ok_or(CouponError::InvalidSerialNumber)
            .and_then(|raw| SerialNumber::parse(&raw))?;

        let pass_code = text(&self.pass_code)
            .ok_or(CouponError::InvalidPassCode)
            .and_then(|raw| PassCode::parse(&raw))?;

        Ok(RedeemCommand {
            serial_number,
            pass_code,
        })
    }
}
