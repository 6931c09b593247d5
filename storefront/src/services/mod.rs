pub mod metrics;
pub mod orders_client;

pub use orders_client::OrdersClient;
