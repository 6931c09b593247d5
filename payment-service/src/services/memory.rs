//! In-memory stores for local runs and tests.

use anyhow::Result;
use async_trait::async_trait;
use service_core::events::{OrderStatus, PaymentEvent};
use std::collections::HashMap;
use std::sync::Mutex;

use super::store::{DuplicateOrder, OrderStore, PaymentEventPublisher, PaymentStore};
use crate::models::{Order, Payment};

#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<HashMap<String, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            orders: Mutex::new(orders.into_iter().map(|o| (o.id.clone(), o)).collect()),
        }
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find_order(&self, id: &str) -> Result<Option<Order>> {
        let orders = self
            .orders
            .lock()
            .map_err(|_| anyhow::anyhow!("order store poisoned"))?;
        Ok(orders.get(id).cloned())
    }

    async fn insert_order(&self, order: Order) -> Result<()> {
        let mut orders = self
            .orders
            .lock()
            .map_err(|_| anyhow::anyhow!("order store poisoned"))?;
        if orders.contains_key(&order.id) {
            return Err(DuplicateOrder(order.id).into());
        }
        orders.insert(order.id.clone(), order);
        Ok(())
    }

    async fn update_order_status(
        &self,
        id: &str,
        expected_version: u64,
        status: OrderStatus,
        version: u64,
    ) -> Result<bool> {
        let mut orders = self
            .orders
            .lock()
            .map_err(|_| anyhow::anyhow!("order store poisoned"))?;
        match orders.get_mut(id) {
            Some(order) if order.version == expected_version => {
                order.status = status;
                order.version = version;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryPaymentStore {
    payments: Mutex<Vec<Payment>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Payment> {
        self.payments
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn insert_payment(&self, payment: Payment) -> Result<()> {
        self.payments
            .lock()
            .map_err(|_| anyhow::anyhow!("payment store poisoned"))?
            .push(payment);
        Ok(())
    }
}

/// Publisher used when no orders endpoint is configured.
pub struct DisabledPublisher;

#[async_trait]
impl PaymentEventPublisher for DisabledPublisher {
    async fn publish(&self, event: PaymentEvent) -> Result<()> {
        tracing::debug!(?event, "Event publishing disabled, dropping event");
        Ok(())
    }
}
