use axum::{middleware::from_fn, routing::get, Router};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::with_request_tracing, SessionKeys,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::Settings;
use crate::handlers::{self, orders::list_orders};
use crate::services::OrdersClient;

/// Shared application state containing service clients
#[derive(Clone)]
pub struct AppState {
    pub session_keys: SessionKeys,
    pub orders_client: Arc<OrdersClient>,
}

impl AppState {
    pub fn new(session_keys: SessionKeys, orders_client: Arc<OrdersClient>) -> Self {
        Self {
            session_keys,
            orders_client,
        }
    }
}

impl AsRef<SessionKeys> for AppState {
    fn as_ref(&self) -> &SessionKeys {
        &self.session_keys
    }
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .route("/orders", get(list_orders))
        .fallback(handlers::not_found)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .with_state(state);

    with_request_tracing(router)
}

pub struct Application {
    address: SocketAddr,
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let orders_client = Arc::new(OrdersClient::new(settings.orders_service.clone()));
        tracing::info!(url = %settings.orders_service.url, "Orders service client configured");

        let state = AppState::new(
            SessionKeys::new(settings.jwt_key.expose_secret()),
            orders_client,
        );

        let addr = settings.common.bind_address();
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let address = listener.local_addr()?;
        let port = address.port();

        tracing::info!("Starting storefront on port {}", port);

        Ok(Self {
            address,
            port,
            listener,
            router: build_router(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Local address the listener is bound to.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}
