//! Coupon lifecycle: issuance and redemption.
//!
//! A coupon is created with `usedAt` unset and is marked used at most once.
//! Expiry is evaluated lazily when a redemption is attempted.

mod hasher;
mod issuer;
mod redeemer;
mod request;
mod serial;

pub use hasher::PassCodeHasher;
pub use issuer::CouponIssuer;
pub use redeemer::CouponRedeemer;
pub use request::{CreateCouponRequest, RedeemCouponRequest};
