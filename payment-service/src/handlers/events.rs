//! Order events pushed by the orders service.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::events::OrderEvent;
use service_core::utils::signature::{
    is_fresh, verify_signature, EVENT_SIGNATURE_HEADER, EVENT_TIMESTAMP_HEADER,
};

use crate::startup::AppState;

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn verify_delivery(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<(), AppError> {
    let timestamp: i64 = header(headers, EVENT_TIMESTAMP_HEADER)
        .and_then(|v| v.parse().ok())
        .ok_or_else(AppError::not_authorized)?;
    let signature = header(headers, EVENT_SIGNATURE_HEADER).ok_or_else(AppError::not_authorized)?;

    if !is_fresh(timestamp, chrono::Utc::now().timestamp()) {
        tracing::warn!(timestamp, "Stale event delivery");
        return Err(AppError::not_authorized());
    }

    let valid = verify_signature(state.events_secret.expose_secret(), timestamp, body, signature)?;
    if !valid {
        tracing::warn!("Event signature verification failed");
        return Err(AppError::not_authorized());
    }

    Ok(())
}

/// Apply a signed `order:*` event to the local read model.
pub async fn receive_order_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    verify_delivery(&state, &headers, &body)?;

    let event: OrderEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid event payload: {}", e)))?;

    tracing::info!(
        subject = event.subject(),
        order_id = %event.order_id(),
        "Received order event"
    );

    state.order_sync.apply(event).await?;

    Ok(StatusCode::NO_CONTENT)
}
