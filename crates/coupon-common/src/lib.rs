//! # Coupon Common
//!
//! Shared types, error codes, and localized messages used across Coupon Vault components.
//!
//! ## Modules
//! - `types` - Core data structures (CouponRecord, SerialNumber, PassCode, etc.)
//! - `error` - Coupon error type and HTTP status mapping
//! - `messages` - Localization table keyed by error/notice code
//! - `constants` - Shared configuration constants

pub mod constants;
pub mod error;
pub mod messages;
pub mod types;

pub use error::CouponError;
pub use messages::{ErrorCode, Locale, NoticeCode};
pub use types::*;
