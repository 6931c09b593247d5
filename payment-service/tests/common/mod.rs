#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use payment_service::models::{Order, Product};
use payment_service::models::Payment;
use payment_service::services::{
    Charge, ChargeGateway, ChargeRequest, InMemoryOrderStore, InMemoryPaymentStore,
    PaymentEventPublisher, PaymentStore,
};
use payment_service::{build_router, AppState};
use secrecy::Secret;
use service_core::events::{OrderStatus, PaymentEvent};
use service_core::middleware::current_user::session_cookie_value;
use service_core::middleware::{SessionKeys, UserClaims, SESSION_COOKIE};
use service_core::utils::signature::{
    generate_signature, EVENT_SIGNATURE_HEADER, EVENT_TIMESTAMP_HEADER,
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const JWT_KEY: &str = "test-jwt-key";
pub const EVENTS_SECRET: &str = "test-events-secret";

/// Records every charge and answers with a deterministic charge id.
#[derive(Default)]
pub struct RecordingGateway {
    pub requests: Mutex<Vec<ChargeRequest>>,
    pub fail: bool,
}

#[async_trait]
impl ChargeGateway for RecordingGateway {
    async fn create_charge(&self, request: ChargeRequest) -> anyhow::Result<Charge> {
        if self.fail {
            return Err(anyhow::anyhow!("Your card was declined."));
        }
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());
        Ok(Charge {
            id: format!("ch_test_{}", requests.len()),
            amount: request.amount,
            currency: request.currency,
        })
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<PaymentEvent>>,
}

#[async_trait]
impl PaymentEventPublisher for RecordingPublisher {
    async fn publish(&self, event: PaymentEvent) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Payment store whose writes always fail, as when MongoDB is unreachable.
pub struct FailingPaymentStore;

#[async_trait]
impl PaymentStore for FailingPaymentStore {
    async fn insert_payment(&self, _payment: Payment) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("connection reset by peer"))
    }
}

pub struct TestApp {
    pub router: Router,
    pub orders: Arc<InMemoryOrderStore>,
    pub payments: Arc<InMemoryPaymentStore>,
    pub gateway: Arc<RecordingGateway>,
    pub publisher: Arc<RecordingPublisher>,
}

impl TestApp {
    pub fn spawn() -> Self {
        Self::with_gateway(RecordingGateway::default())
    }

    pub fn with_gateway(gateway: RecordingGateway) -> Self {
        let payments = Arc::new(InMemoryPaymentStore::new());
        Self::build(gateway, payments.clone(), payments)
    }

    /// App whose payment inserts fail after the charge is captured.
    pub fn with_failing_payments() -> Self {
        Self::build(
            RecordingGateway::default(),
            Arc::new(FailingPaymentStore),
            Arc::new(InMemoryPaymentStore::new()),
        )
    }

    fn build(
        gateway: RecordingGateway,
        payment_store: Arc<dyn PaymentStore>,
        payments: Arc<InMemoryPaymentStore>,
    ) -> Self {
        let orders = Arc::new(InMemoryOrderStore::new());
        let gateway = Arc::new(gateway);
        let publisher = Arc::new(RecordingPublisher::default());

        let state = AppState::new(
            SessionKeys::new(JWT_KEY),
            Secret::new(EVENTS_SECRET.to_string()),
            orders.clone(),
            payment_store,
            gateway.clone(),
            publisher.clone(),
            "usd",
        );

        TestApp {
            router: build_router(state),
            orders,
            payments,
            gateway,
            publisher,
        }
    }

    /// Store an order in the read model and return it.
    pub async fn save_order(&self, user_id: &str, status: OrderStatus, price: f64) -> Order {
        use payment_service::services::OrderStore;

        let order = Order {
            id: uuid::Uuid::new_v4().simple().to_string(),
            user_id: user_id.to_string(),
            status,
            version: 0,
            product: Product {
                id: uuid::Uuid::new_v4().simple().to_string(),
                title: "Sample Dress".to_string(),
                price,
                user_id: "seller".to_string(),
                image: "./asset/sample.jpg".to_string(),
                colors: Some("White,Black".to_string()),
                sizes: Some("S,M,L".to_string()),
                count_in_stock: 1,
            },
        };
        self.orders.insert_order(order.clone()).await.unwrap();
        order
    }

    pub async fn post_payment(
        &self,
        cookie: Option<String>,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/payments")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn post_event(&self, body: &str, secret: &str, timestamp: i64) -> StatusCode {
        let signature = generate_signature(secret, timestamp, body.as_bytes()).unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/events/orders")
            .header(header::CONTENT_TYPE, "application/json")
            .header(EVENT_TIMESTAMP_HEADER, timestamp.to_string())
            .header(EVENT_SIGNATURE_HEADER, signature)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await.0
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }
}

/// Session cookie for `user_id`, as the storefront would send it.
pub fn signin(user_id: &str) -> String {
    let jwt = SessionKeys::new(JWT_KEY)
        .sign(&UserClaims {
            id: user_id.to_string(),
            email: "test@test.com".to_string(),
            iat: None,
            exp: None,
        })
        .unwrap();
    format!("{}={}", SESSION_COOKIE, session_cookie_value(&jwt))
}

pub fn new_user_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
