#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use service_core::middleware::current_user::session_cookie_value;
use service_core::middleware::{SessionKeys, UserClaims, SESSION_COOKIE};
use std::sync::Arc;
use storefront::config::OrdersServiceSettings;
use storefront::services::OrdersClient;
use storefront::{build_router, AppState};
use tower::ServiceExt;
use wiremock::MockServer;

pub const JWT_KEY: &str = "test-jwt-key";

pub struct TestApp {
    pub router: Router,
    pub orders_service: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let orders_service = MockServer::start().await;
        let client = OrdersClient::new(OrdersServiceSettings {
            url: orders_service.uri(),
        });
        let state = AppState::new(SessionKeys::new(JWT_KEY), Arc::new(client));

        TestApp {
            router: build_router(state),
            orders_service,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let response = self
            .router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }
}

pub fn signin(user_id: &str) -> String {
    let jwt = SessionKeys::new(JWT_KEY)
        .sign(&UserClaims {
            id: user_id.to_string(),
            email: "buyer@test.com".to_string(),
            iat: None,
            exp: None,
        })
        .unwrap();
    format!("{}={}", SESSION_COOKIE, session_cookie_value(&jwt))
}
