use crate::config::OrdersServiceSettings;
use crate::models::OrderSummary;
use reqwest::{Client, StatusCode};
use service_core::error::AppError;
use service_core::observability::TracedClientExt;

pub struct OrdersClient {
    client: Client,
    settings: OrdersServiceSettings,
}

impl OrdersClient {
    pub fn new(settings: OrdersServiceSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    /// List the caller's orders, authenticating with the caller's own
    /// session cookie.
    pub async fn list_orders(
        &self,
        cookie: &str,
        request_id: Option<&str>,
    ) -> Result<Vec<OrderSummary>, AppError> {
        let url = format!("{}/api/orders", self.settings.url);

        let response = self
            .client
            .traced_get(&url)
            .cookie(cookie)
            .send_with_request_id(request_id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to send GET request to {}: {}", url, e);
                AppError::BadGateway("Orders service unavailable".to_string())
            })?;

        match response.status() {
            status if status.is_success() => response.json().await.map_err(|e| {
                tracing::error!(error = %e, "Orders service returned an unreadable body");
                AppError::BadGateway("Orders service returned an invalid response".to_string())
            }),
            StatusCode::UNAUTHORIZED => Err(AppError::not_authorized()),
            status => {
                tracing::error!(status = %status, "Orders service rejected order listing");
                Err(AppError::BadGateway(format!(
                    "Orders service responded with {}",
                    status
                )))
            }
        }
    }
}
