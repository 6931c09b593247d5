pub mod charges;
pub mod memory;
pub mod metrics;
pub mod order_sync;
pub mod publisher;
pub mod repository;
pub mod store;
pub mod stripe;

pub use charges::{authorize_charge, ChargeService};
pub use memory::{DisabledPublisher, InMemoryOrderStore, InMemoryPaymentStore};
pub use metrics::{get_metrics, init_metrics};
pub use order_sync::OrderSync;
pub use publisher::HttpEventPublisher;
pub use repository::PaymentRepository;
pub use store::{
    Charge, ChargeGateway, ChargeRequest, DuplicateOrder, OrderStore, PaymentEventPublisher,
    PaymentStore,
};
pub use stripe::StripeClient;
