//! Charge creation: order guards, processor call, payment record.

use service_core::error::AppError;
use service_core::events::{OrderStatus, PaymentCreatedData, PaymentEvent};
use service_core::middleware::CurrentUser;
use std::sync::Arc;

use super::metrics::{record_amount, record_charge};
use super::store::{ChargeGateway, ChargeRequest, OrderStore, PaymentEventPublisher, PaymentStore};
use crate::models::{Order, Payment};

/// Check that `caller` may pay for `order`.
///
/// Checks run in a fixed order: existence, ownership, then status. An order
/// owned by someone else is rejected as unauthorized whatever its status.
pub fn authorize_charge(order: Option<Order>, caller: &CurrentUser) -> Result<Order, AppError> {
    let order = order.ok_or_else(AppError::not_found)?;

    if order.user_id != caller.id {
        return Err(AppError::not_authorized());
    }

    if order.status == OrderStatus::Cancelled {
        return Err(AppError::bad_request("Cannot pay for a cancelled order"));
    }

    Ok(order)
}

#[derive(Clone)]
pub struct ChargeService {
    orders: Arc<dyn OrderStore>,
    payments: Arc<dyn PaymentStore>,
    gateway: Arc<dyn ChargeGateway>,
    publisher: Arc<dyn PaymentEventPublisher>,
    currency: String,
}

impl ChargeService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        payments: Arc<dyn PaymentStore>,
        gateway: Arc<dyn ChargeGateway>,
        publisher: Arc<dyn PaymentEventPublisher>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            orders,
            payments,
            gateway,
            publisher,
            currency: currency.into(),
        }
    }

    /// Charge the caller's order and record the payment.
    ///
    /// Nothing spans the processor call and the insert: if the insert fails
    /// the charge stands without a payment record.
    pub async fn create_charge(
        &self,
        caller: &CurrentUser,
        order_id: &str,
        token: &str,
    ) -> Result<Payment, AppError> {
        let order = self
            .orders
            .find_order(order_id)
            .await
            .map_err(AppError::DatabaseError)?;

        let order = authorize_charge(order, caller).map_err(|e| {
            tracing::info!(order_id = %order_id, user_id = %caller.id, reason = %e, "Charge refused");
            record_charge("refused");
            e
        })?;

        let request = ChargeRequest {
            amount: order.product.amount_in_minor_units(),
            currency: self.currency.clone(),
            source: token.to_string(),
            order_id: order.id.clone(),
        };

        let charge = self.gateway.create_charge(request).await.map_err(|e| {
            record_charge("failed");
            AppError::InternalError(e.context("Charge creation failed"))
        })?;

        let payment = Payment::new(order.id.clone(), charge.id.clone());
        self.payments
            .insert_payment(payment.clone())
            .await
            .map_err(|e| {
                tracing::error!(
                    order_id = %order.id,
                    charge_id = %charge.id,
                    error = %e,
                    "Charge captured but payment record not saved"
                );
                AppError::DatabaseError(e)
            })?;

        record_charge("succeeded");
        record_amount(&charge.currency, charge.amount);

        tracing::info!(
            payment_id = %payment.id,
            order_id = %order.id,
            charge_id = %charge.id,
            amount = charge.amount,
            "Payment recorded"
        );

        let event = PaymentEvent::Created(PaymentCreatedData {
            id: payment.id.clone(),
            order_id: payment.order_id.clone(),
            stripe_id: payment.stripe_id.clone(),
        });
        if let Err(e) = self.publisher.publish(event).await {
            tracing::warn!(payment_id = %payment.id, error = %e, "Failed to publish payment:created");
        }

        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use axum::http::StatusCode;

    fn caller(id: &str) -> CurrentUser {
        CurrentUser {
            id: id.to_string(),
            email: "test@test.com".to_string(),
        }
    }

    fn order(user_id: &str, status: OrderStatus) -> Order {
        Order {
            id: "order-1".to_string(),
            user_id: user_id.to_string(),
            status,
            version: 0,
            product: Product {
                id: "prod-1".to_string(),
                title: "Sample Dress".to_string(),
                price: 19.9,
                user_id: "seller-1".to_string(),
                image: String::new(),
                colors: None,
                sizes: None,
                count_in_stock: 1,
            },
        }
    }

    #[test]
    fn missing_order_is_not_found() {
        let err = authorize_charge(None, &caller("alice")).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_users_order_is_unauthorized_for_every_status() {
        for status in [
            OrderStatus::Created,
            OrderStatus::Cancelled,
            OrderStatus::AwaitingPayment,
            OrderStatus::Completed,
        ] {
            let err = authorize_charge(Some(order("bob", status)), &caller("alice")).unwrap_err();
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED, "status {}", status);
        }
    }

    #[test]
    fn cancelled_own_order_is_bad_request() {
        let err = authorize_charge(Some(order("alice", OrderStatus::Cancelled)), &caller("alice"))
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("cancelled"));
    }

    #[test]
    fn open_own_order_is_allowed() {
        for status in [
            OrderStatus::Created,
            OrderStatus::AwaitingPayment,
            OrderStatus::Completed,
        ] {
            let order = authorize_charge(Some(order("alice", status)), &caller("alice")).unwrap();
            assert_eq!(order.id, "order-1");
        }
    }
}
