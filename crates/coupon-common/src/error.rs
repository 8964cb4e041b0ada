//! Common error types for Coupon Vault components.

use thiserror::Error;

use crate::messages::{ErrorCode, Locale};

/// Errors returned by the coupon operations
#[derive(Debug, Error)]
pub enum CouponError {
    /// Usage count missing, zero, non-numeric or longer than five digits
    #[error("Invalid usage count")]
    InvalidNumber,

    /// Expiry date not in `YYYY-MM-DD` form or not a real date
    #[error("Invalid expiry date")]
    InvalidExpiry,

    /// Passcode is not exactly five digits
    #[error("Invalid passcode format")]
    InvalidPassCode,

    /// Serial number is not exactly twelve digits
    #[error("Invalid serial number format")]
    InvalidSerialNumber,

    /// Request body could not be parsed
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// No coupon stored under the serial number
    #[error("Unknown serial number")]
    UnknownSerialNumber,

    /// Passcode hash does not match the stored hash
    #[error("Incorrect passcode")]
    IncorrectPassCode,

    /// Coupon could not be persisted
    #[error("Issue failed: {0}")]
    IssueFailed(String),

    /// Coupon could not be marked as used
    #[error("Redeem failed: {0}")]
    RedeemFailed(String),
}

impl CouponError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidNumber
            | Self::InvalidExpiry
            | Self::InvalidPassCode
            | Self::InvalidSerialNumber
            | Self::MalformedRequest(_) => 400,
            Self::IncorrectPassCode => 403,
            Self::UnknownSerialNumber => 404,
            Self::IssueFailed(_) | Self::RedeemFailed(_) => 500,
        }
    }

    /// Returns the stable wire code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidNumber => ErrorCode::InvalidNumber,
            Self::InvalidExpiry => ErrorCode::InvalidExpiry,
            Self::InvalidPassCode => ErrorCode::InvalidPassCode,
            Self::InvalidSerialNumber => ErrorCode::InvalidSerialNumber,
            Self::MalformedRequest(_) => ErrorCode::MalformedRequest,
            Self::UnknownSerialNumber => ErrorCode::UnknownSerialNumber,
            Self::IncorrectPassCode => ErrorCode::IncorrectPassCode,
            Self::IssueFailed(_) => ErrorCode::IssueFailed,
            Self::RedeemFailed(_) => ErrorCode::RedeemFailed,
        }
    }

    /// User-facing message in the given locale
    pub fn localized(&self, locale: Locale) -> &'static str {
        self.code().message(locale)
    }

    /// Returns true for failures on the server side
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}
