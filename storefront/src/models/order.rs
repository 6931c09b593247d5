use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status as far as the list page cares.
///
/// The orders service owns the full status set; anything other than
/// `cancelled` or `completed` is still open for payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListedStatus {
    Cancelled,
    Completed,
    #[serde(other)]
    Open,
}

/// An order as listed by the orders service for its owner.
///
/// Display timestamps stay as the ISO strings the service sends; only
/// `expires_at` is parsed since the countdown needs arithmetic on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    pub status: ListedStatus,
    pub created_at: String,
    pub total_price: f64,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub is_delivered: bool,
    #[serde(default)]
    pub delivered_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}
