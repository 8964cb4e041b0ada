//! Coupon issue and redeem endpoints.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use coupon_common::{CouponError, ErrorCode, Locale, NoticeCode};
use serde::Serialize;

use crate::coupons::{CreateCouponRequest, RedeemCouponRequest};
use crate::state::AppState;
use crate::store::CouponStore;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueResponse {
    serial_number: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    message: String,
    notice_code: NoticeCode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_code: ErrorCode,
    error_message: &'static str,
}

/// Coupon error rendered in the configured locale
pub struct ApiError {
    error: CouponError,
    locale: Locale,
}

impl ApiError {
    fn new(error: CouponError, locale: Locale) -> Self {
        Self { error, locale }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.error.is_server_error() {
            tracing::error!(error = %self.error, "Coupon request failed");
        } else {
            tracing::debug!(error = %self.error, "Coupon request rejected");
        }

        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error_code: self.error.code(),
            error_message: self.error.localized(self.locale),
        };
        (status, Json(body)).into_response()
    }
}

/// Issue a coupon
///
/// Returns:
/// - 200: `{ serialNumber }`
/// - 400: validation failure
/// - 500: the coupon could not be stored
pub async fn create_coupon<S>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateCouponRequest>, JsonRejection>,
) -> Result<Json<IssueResponse>, ApiError>
where
    S: CouponStore + Sync,
{
    let locale = state.locale();
    let Json(payload) = payload
        .map_err(|e| ApiError::new(CouponError::MalformedRequest(e.body_text()), locale))?;

    let cmd = payload.validate().map_err(|e| ApiError::new(e, locale))?;
    let serial = state
        .issuer
        .issue(&state.store, &cmd)
        .await
        .map_err(|e| ApiError::new(e, locale))?;

    Ok(Json(IssueResponse {
        serial_number: serial.to_string(),
    }))
}

/// Redeem a coupon
///
/// Returns:
/// - 200: redeemed, already used, or expired (see `noticeCode`)
/// - 400: validation failure
/// - 403: incorrect passcode
/// - 404: unknown serial number
/// - 500: the coupon could not be marked used
pub async fn redeem_coupon<S>(
    State(state): State<AppState<S>>,
    payload: Result<Json<RedeemCouponRequest>, JsonRejection>,
) -> Result<Json<RedeemResponse>, ApiError>
where
    S: CouponStore + Sync,
{
    let locale = state.locale();
    let Json(payload) = payload
        .map_err(|e| ApiError::new(CouponError::MalformedRequest(e.body_text()), locale))?;

    let cmd = payload.validate().map_err(|e| ApiError::new(e, locale))?;
    let outcome = state
        .redeemer
        .redeem(&state.store, &cmd)
        .await
        .map_err(|e| ApiError::new(e, locale))?;

    Ok(Json(RedeemResponse {
        message: outcome.message(locale),
        notice_code: outcome.notice(),
    }))
}
