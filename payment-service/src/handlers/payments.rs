use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use service_core::error::AppError;
use service_core::middleware::CurrentUser;
use validator::Validate;

use crate::{
    dtos::{CreateChargeRequest, PaymentResponse},
    startup::AppState,
};

/// Charge an order on behalf of the signed-in user.
///
/// 404 when the order is unknown, 401 when it belongs to someone else, 400
/// when it was cancelled. A successful charge answers 201 with the payment.
pub async fn create_charge(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreateChargeRequest>, AppError>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    payload.validate()?;

    tracing::info!(
        order_id = %payload.order_id,
        user_id = %user.id,
        "Creating charge"
    );

    let payment = state
        .charges
        .create_charge(&user, &payload.order_id, &payload.token)
        .await?;

    Ok((StatusCode::CREATED, Json(PaymentResponse::from(payment))))
}
