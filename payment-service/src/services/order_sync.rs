//! Keeps the local order read model in step with the orders service.

use service_core::error::AppError;
use service_core::events::{OrderEvent, OrderStatus};
use std::sync::Arc;

use super::store::{DuplicateOrder, OrderStore};
use crate::models::Order;

#[derive(Clone)]
pub struct OrderSync {
    orders: Arc<dyn OrderStore>,
}

impl OrderSync {
    pub fn new(orders: Arc<dyn OrderStore>) -> Self {
        Self { orders }
    }

    /// Apply one order event.
    ///
    /// Events must arrive in version order: a cancellation at version `n` only
    /// applies to the order stored at `n - 1`, otherwise it is reported as not
    /// found so the publisher redelivers it later.
    pub async fn apply(&self, event: OrderEvent) -> Result<(), AppError> {
        match event {
            OrderEvent::Created(data) => {
                if self
                    .orders
                    .find_order(&data.id)
                    .await
                    .map_err(AppError::DatabaseError)?
                    .is_some()
                {
                    return Err(AppError::Conflict(anyhow::anyhow!(
                        "Order {} already exists",
                        data.id
                    )));
                }

                let order = Order::from(data);
                tracing::info!(
                    order_id = %order.id,
                    version = order.version,
                    status = %order.status,
                    "Recording order"
                );
                // A concurrent delivery of the same event can win the insert.
                self.orders.insert_order(order).await.map_err(|e| {
                    if e.is::<DuplicateOrder>() {
                        AppError::Conflict(e)
                    } else {
                        AppError::DatabaseError(e)
                    }
                })
            }
            OrderEvent::Cancelled(data) => {
                let previous = data.version.checked_sub(1).ok_or_else(|| {
                    AppError::bad_request("Cancellation must carry a version above zero")
                })?;

                let applied = self
                    .orders
                    .update_order_status(&data.id, previous, OrderStatus::Cancelled, data.version)
                    .await
                    .map_err(AppError::DatabaseError)?;

                if !applied {
                    tracing::warn!(
                        order_id = %data.id,
                        version = data.version,
                        "No order at the preceding version"
                    );
                    return Err(AppError::NotFound(anyhow::anyhow!("Order not found")));
                }

                tracing::info!(order_id = %data.id, version = data.version, "Order cancelled");
                Ok(())
            }
        }
    }
}
