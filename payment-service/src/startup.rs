//! Application startup and lifecycle management.

use crate::config::Config;
use crate::handlers;
use crate::services::{
    ChargeGateway, ChargeService, DisabledPublisher, HttpEventPublisher, OrderStore, OrderSync,
    PaymentEventPublisher, PaymentRepository, PaymentStore, StripeClient,
};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use mongodb::{options::ClientOptions, Client};
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::with_request_tracing, SessionKeys,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub session_keys: SessionKeys,
    pub events_secret: Secret<String>,
    pub charges: ChargeService,
    pub order_sync: OrderSync,
}

impl AppState {
    pub fn new(
        session_keys: SessionKeys,
        events_secret: Secret<String>,
        orders: Arc<dyn OrderStore>,
        payments: Arc<dyn PaymentStore>,
        gateway: Arc<dyn ChargeGateway>,
        publisher: Arc<dyn PaymentEventPublisher>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            session_keys,
            events_secret,
            charges: ChargeService::new(orders.clone(), payments, gateway, publisher, currency),
            order_sync: OrderSync::new(orders),
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
        .route("/api/payments", post(handlers::payments::create_charge))
        .route("/events/orders", post(handlers::events::receive_order_event))
        .fallback(handlers::not_found)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .with_state(state);

    with_request_tracing(router)
}

/// Application container for managing server lifecycle.
pub struct Application {
    address: SocketAddr,
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Connect to MongoDB, wire Stripe and the event publisher, and bind the
    /// listener (port 0 picks a random port).
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(config.database.url.expose_secret())
            .await
            .map_err(|e| {
                tracing::error!("Failed to parse MongoDB connection string: {}", e);
                AppError::DatabaseError(e.into())
            })?;
        client_options.app_name = Some(config.service_name.clone());

        let client = Client::with_options(client_options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::DatabaseError(e.into())
        })?;
        let db = client.database(&config.database.db_name);

        let repository = Arc::new(PaymentRepository::new(&db));
        repository.init_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            AppError::DatabaseError(e)
        })?;

        let stripe = StripeClient::new(config.stripe.clone());
        if stripe.is_configured() {
            tracing::info!("Stripe client initialized");
        } else {
            tracing::warn!("Stripe credentials not configured - charges will fail");
        }

        let publisher: Arc<dyn PaymentEventPublisher> = match &config.events.orders_events_url {
            Some(url) => {
                tracing::info!(url = %url, "Publishing payment events");
                Arc::new(HttpEventPublisher::new(url.clone(), config.events.secret.clone()))
            }
            None => {
                tracing::warn!("ORDERS_EVENTS_URL not set - payment events will not be published");
                Arc::new(DisabledPublisher)
            }
        };

        let state = AppState::new(
            SessionKeys::new(config.auth.jwt_key.expose_secret()),
            config.events.secret.clone(),
            repository.clone(),
            repository,
            Arc::new(stripe),
            publisher,
            config.stripe.currency.clone(),
        );

        let addr = config.common.bind_address();
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let address = listener.local_addr()?;
        let port = address.port();

        tracing::info!("Payment service listening on port {}", port);

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
