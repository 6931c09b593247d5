//! Order lifecycle vocabulary and the events exchanged between services.
//!
//! Events travel as `{ "subject": ..., "data": {...} }` JSON envelopes with
//! camelCase payload fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an order, shared by every service that reads orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order placed, product reserved, not yet paid.
    #[serde(rename = "created")]
    Created,
    /// Order expired or was cancelled by the user.
    #[serde(rename = "cancelled")]
    Cancelled,
    #[serde(rename = "awaiting:payment")]
    AwaitingPayment,
    /// Payment captured.
    #[serde(rename = "completed")]
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::AwaitingPayment => "awaiting:payment",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product snapshot carried by `order:created`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductData {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub user_id: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub colors: Option<String>,
    #[serde(default)]
    pub sizes: Option<String>,
    #[serde(default)]
    pub count_in_stock: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedData {
    pub id: String,
    pub version: u64,
    pub status: OrderStatus,
    pub user_id: String,
    pub product: ProductData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCancelledData {
    pub id: String,
    pub version: u64,
}

/// Events published by the orders service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "subject", content = "data")]
pub enum OrderEvent {
    #[serde(rename = "order:created")]
    Created(OrderCreatedData),
    #[serde(rename = "order:cancelled")]
    Cancelled(OrderCancelledData),
}

impl OrderEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            OrderEvent::Created(_) => "order:created",
            OrderEvent::Cancelled(_) => "order:cancelled",
        }
    }

    pub fn order_id(&self) -> &str {
        match self {
            OrderEvent::Created(data) => &data.id,
            OrderEvent::Cancelled(data) => &data.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreatedData {
    pub id: String,
    pub order_id: String,
    pub stripe_id: String,
}

/// Events published by the payment service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "subject", content = "data")]
pub enum PaymentEvent {
    #[serde(rename = "payment:created")]
    Created(PaymentCreatedData),
}
