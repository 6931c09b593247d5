use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Payment;

/// Body of `POST /api/payments`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateChargeRequest {
    /// Card token produced by Stripe checkout.
    #[serde(default)]
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "OrderId is required"))]
    pub order_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: String,
    pub order_id: String,
    pub stripe_id: String,
    pub created_at: String,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            order_id: payment.order_id,
            stripe_id: payment.stripe_id,
            created_at: payment.created_at.to_chrono().to_rfc3339(),
        }
    }
}
