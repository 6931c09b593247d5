pub mod order;

pub use order::{ListedStatus, OrderSummary};
