//! Storage and gateway seams used by the charge flow.
//!
//! MongoDB and Stripe back these in production; the in-memory versions in
//! [`super::memory`] back local runs and the test suites.

use anyhow::Result;
use async_trait::async_trait;
use service_core::events::{OrderStatus, PaymentEvent};

use crate::models::{Order, Payment};

/// An order with this id is already stored.
#[derive(Debug, thiserror::Error)]
#[error("Order {0} already exists")]
pub struct DuplicateOrder(pub String);

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_order(&self, id: &str) -> Result<Option<Order>>;

    /// Fails with [`DuplicateOrder`] when the id is taken.
    async fn insert_order(&self, order: Order) -> Result<()>;

    /// Move the order to `status` at `version`, but only if it is currently
    /// at `expected_version`. Returns `false` when no order matched.
    async fn update_order_status(
        &self,
        id: &str,
        expected_version: u64,
        status: OrderStatus,
        version: u64,
    ) -> Result<bool>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn insert_payment(&self, payment: Payment) -> Result<()>;
}

/// A charge to submit to the payment processor.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    /// Smallest currency unit.
    pub amount: i64,
    pub currency: String,
    /// Card token from checkout.
    pub source: String,
    pub order_id: String,
}

/// A captured charge as reported by the processor.
#[derive(Debug, Clone, PartialEq)]
pub struct Charge {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[async_trait]
pub trait ChargeGateway: Send + Sync {
    async fn create_charge(&self, request: ChargeRequest) -> Result<Charge>;
}

#[async_trait]
pub trait PaymentEventPublisher: Send + Sync {
    async fn publish(&self, event: PaymentEvent) -> Result<()>;
}
