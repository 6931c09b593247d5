mod common;

use axum::http::StatusCode;
use common::{new_user_id, now, signin, TestApp, EVENTS_SECRET};
use payment_service::services::OrderStore;
use serde_json::json;
use service_core::events::OrderStatus;

fn order_created(order_id: &str, user_id: &str, price: f64) -> String {
    json!({
        "subject": "order:created",
        "data": {
            "id": order_id,
            "version": 0,
            "status": "created",
            "userId": user_id,
            "product": {
                "id": "prod-1",
                "title": "Sample Dress",
                "price": price,
                "userId": "seller-1",
                "image": "./asset/sample.jpg",
                "colors": "White,Black",
                "sizes": "S,M,L",
                "countInStock": 1
            }
        }
    })
    .to_string()
}

fn order_cancelled(order_id: &str, version: u64) -> String {
    json!({
        "subject": "order:cancelled",
        "data": { "id": order_id, "version": version }
    })
    .to_string()
}

#[tokio::test]
async fn order_created_is_recorded() {
    let app = TestApp::spawn();
    let order_id = new_user_id();

    let status = app
        .post_event(&order_created(&order_id, "user-1", 19.9), EVENTS_SECRET, now())
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let order = app.orders.find_order(&order_id).await.unwrap().unwrap();
    assert_eq!(order.user_id, "user-1");
    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.version, 0);
    assert_eq!(order.product.amount_in_minor_units(), 1990);
}

#[tokio::test]
async fn order_cancelled_advances_version() {
    let app = TestApp::spawn();
    let order_id = new_user_id();

    app.post_event(&order_created(&order_id, "user-1", 5.0), EVENTS_SECRET, now())
        .await;
    let status = app
        .post_event(&order_cancelled(&order_id, 1), EVENTS_SECRET, now())
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let order = app.orders.find_order(&order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(order.version, 1);
}

#[tokio::test]
async fn skipped_version_is_not_applied() {
    let app = TestApp::spawn();
    let order_id = new_user_id();

    app.post_event(&order_created(&order_id, "user-1", 5.0), EVENTS_SECRET, now())
        .await;
    let status = app
        .post_event(&order_cancelled(&order_id, 2), EVENTS_SECRET, now())
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let order = app.orders.find_order(&order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Created);
}

#[tokio::test]
async fn duplicate_order_created_conflicts() {
    let app = TestApp::spawn();
    let order_id = new_user_id();
    let body = order_created(&order_id, "user-1", 5.0);

    app.post_event(&body, EVENTS_SECRET, now()).await;
    let status = app.post_event(&body, EVENTS_SECRET, now()).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn wrongly_signed_event_is_rejected() {
    let app = TestApp::spawn();
    let order_id = new_user_id();

    let status = app
        .post_event(&order_created(&order_id, "user-1", 5.0), "wrong-secret", now())
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.orders.find_order(&order_id).await.unwrap().is_none());
}

#[tokio::test]
async fn stale_event_is_rejected() {
    let app = TestApp::spawn();

    let status = app
        .post_event(
            &order_created(&new_user_id(), "user-1", 5.0),
            EVENTS_SECRET,
            now() - 3600,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_event_is_bad_request() {
    let app = TestApp::spawn();

    let status = app
        .post_event(r#"{"subject":"order:shipped","data":{}}"#, EVENTS_SECRET, now())
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cancelled_order_from_events_cannot_be_paid() {
    let app = TestApp::spawn();
    let user_id = new_user_id();
    let order_id = new_user_id();

    app.post_event(&order_created(&order_id, &user_id, 20.0), EVENTS_SECRET, now())
        .await;
    app.post_event(&order_cancelled(&order_id, 1), EVENTS_SECRET, now())
        .await;

    let (status, _) = app
        .post_payment(
            Some(signin(&user_id)),
            json!({ "token": "tok_visa", "orderId": order_id }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
