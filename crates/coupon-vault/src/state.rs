//! Application state and shared resources.

use coupon_common::Locale;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::coupons::{CouponIssuer, CouponRedeemer, PassCodeHasher};
use crate::store::CouponStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState<S> {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Coupon store
    pub store: S,

    /// Coupon issuer
    pub issuer: Arc<CouponIssuer>,

    /// Coupon redeemer
    pub redeemer: Arc<CouponRedeemer>,
}

impl<S: CouponStore> AppState<S> {
    /// Wire services around an already-connected store
    pub fn new(config: AppConfig, store: S) -> Self {
        let hasher = Arc::new(PassCodeHasher::new(config.salt.clone()));
        let issuer = Arc::new(CouponIssuer::new(hasher.clone(), config.issue.max_attempts));
        let redeemer = Arc::new(CouponRedeemer::new(hasher));

        Self {
            config: Arc::new(config),
            store,
            issuer,
            redeemer,
        }
    }

    /// Language for response messages
    pub fn locale(&self) -> Locale {
        self.config.locale
    }
}
