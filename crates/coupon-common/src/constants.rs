//! Shared constants for Coupon Vault components.

/// Default Redis connection URL
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Length of a coupon serial number (digits only)
pub const SERIAL_NUMBER_LEN: usize = 12;

/// Length of a redemption passcode (digits only)
pub const PASS_CODE_LEN: usize = 5;

/// Maximum digits in a usage count (so 1..=99999)
pub const USAGE_COUNT_MAX_DIGITS: usize = 5;

/// Length of an `expiredAt` date string (`YYYY-MM-DD`)
pub const EXPIRY_DATE_LEN: usize = 10;

/// Serial number candidates tried before issuance gives up
pub const DEFAULT_MAX_ISSUE_ATTEMPTS: u32 = 32;

/// HTTP resource path for both coupon operations
pub const COUPONS_PATH: &str = "/coupons";
