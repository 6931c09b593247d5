use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use service_core::events::{OrderCreatedData, OrderStatus, ProductData};
use uuid::Uuid;

/// Product snapshot embedded in an order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub title: String,
    /// Major currency units, e.g. dollars.
    pub price: f64,
    pub user_id: String,
    pub image: String,
    pub colors: Option<String>,
    pub sizes: Option<String>,
    pub count_in_stock: i64,
}

impl Product {
    /// Price in the smallest currency unit (cents for USD).
    pub fn amount_in_minor_units(&self) -> i64 {
        (self.price * 100.0).round() as i64
    }
}

impl From<ProductData> for Product {
    fn from(data: ProductData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            price: data.price,
            user_id: data.user_id,
            image: data.image,
            colors: data.colors,
            sizes: data.sizes,
            count_in_stock: data.count_in_stock,
        }
    }
}

/// Local read model of an order owned by the orders service.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub status: OrderStatus,
    pub version: u64,
    pub product: Product,
}

impl From<OrderCreatedData> for Order {
    fn from(data: OrderCreatedData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            status: data.status,
            version: data.version,
            product: data.product.into(),
        }
    }
}

/// Link between an order and the Stripe charge that paid for it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: String,
    pub order_id: String,
    pub stripe_id: String,
    pub created_at: DateTime,
}

impl Payment {
    pub fn new(order_id: impl Into<String>, stripe_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.into(),
            stripe_id: stripe_id.into(),
            created_at: DateTime::now(),
        }
    }
}
