//! HTTP route handlers for Coupon Vault.

use axum::{
    Router,
    routing::{get, post},
};
use coupon_common::constants::COUPONS_PATH;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::store::CouponStore;

mod coupons;
mod health;

/// Create the main application router
pub fn create_router<S>(state: AppState<S>) -> Router
where
    S: CouponStore + Clone + Sync + 'static,
{
    Router::new()
        // Health & Status
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check::<S>))

        // Coupon lifecycle
        .route(
            COUPONS_PATH,
            post(coupons::create_coupon::<S>).put(coupons::redeem_coupon::<S>),
        )

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
