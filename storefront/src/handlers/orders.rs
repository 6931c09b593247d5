use crate::services::metrics::record_render;
use crate::startup::AppState;
use crate::views::order_list::{build_rows, OrderRow};
use askama::Template;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::Html,
};
use service_core::error::AppError;
use service_core::middleware::CurrentUser;
use service_core::observability::extract_request_id;

#[derive(Template)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub email: String,
    pub rows: Vec<OrderRow>,
}

#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_orders(
    State(state): State<AppState>,
    user: CurrentUser,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let request_id = extract_request_id(&headers);

    let orders = state
        .orders_client
        .list_orders(cookie, request_id.as_deref())
        .await
        .inspect_err(|_| record_render("upstream_error"))?;

    tracing::info!(count = orders.len(), "Rendering order list");

    let template = OrdersTemplate {
        email: user.email,
        rows: build_rows(&orders, chrono::Utc::now()),
    };
    let html = template.render().map_err(|e| {
        record_render("template_error");
        AppError::InternalError(anyhow::anyhow!("Failed to render orders page: {}", e))
    })?;

    record_render("ok");
    Ok(Html(html))
}
