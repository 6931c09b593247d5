use crate::models::{Order, Payment};
use anyhow::Result;
use async_trait::async_trait;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{bson::doc, Collection, Database, IndexModel};
use service_core::events::OrderStatus;

use super::store::{DuplicateOrder, OrderStore, PaymentStore};

const DUPLICATE_KEY_CODE: i32 = 11000;

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

/// MongoDB-backed order read model and payment records.
#[derive(Clone)]
pub struct PaymentRepository {
    order_collection: Collection<Order>,
    payment_collection: Collection<Payment>,
}

impl PaymentRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            order_collection: db.collection("orders"),
            payment_collection: db.collection("payments"),
        }
    }

    pub async fn init_indexes(&self) -> Result<()> {
        // One payment per charge
        let stripe_index = IndexModel::builder()
            .keys(doc! { "stripe_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("payment_stripe_id_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        let order_index = IndexModel::builder()
            .keys(doc! { "order_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("payment_order_id_idx".to_string())
                    .build(),
            )
            .build();

        self.payment_collection
            .create_indexes([stripe_index, order_index], None)
            .await?;

        // Version lookups for optimistic updates
        let version_index = IndexModel::builder()
            .keys(doc! { "_id": 1, "version": 1 })
            .options(
                IndexOptions::builder()
                    .name("order_version_idx".to_string())
                    .build(),
            )
            .build();

        self.order_collection
            .create_indexes([version_index], None)
            .await?;

        tracing::info!("Payment service indexes initialized");
        Ok(())
    }
}

#[async_trait]
impl OrderStore for PaymentRepository {
    async fn find_order(&self, id: &str) -> Result<Option<Order>> {
        let filter = doc! { "_id": id };
        let order = self.order_collection.find_one(filter, None).await?;
        Ok(order)
    }

    async fn insert_order(&self, order: Order) -> Result<()> {
        let id = order.id.clone();
        match self.order_collection.insert_one(order, None).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(DuplicateOrder(id).into()),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_order_status(
        &self,
        id: &str,
        expected_version: u64,
        status: OrderStatus,
        version: u64,
    ) -> Result<bool> {
        let filter = doc! {
            "_id": id,
            "version": expected_version as i64
        };
        let update = doc! {
            "$set": {
                "status": mongodb::bson::to_bson(&status)?,
                "version": version as i64
            }
        };
        let result = self
            .order_collection
            .update_one(filter, update, None)
            .await?;
        Ok(result.matched_count == 1)
    }
}

#[async_trait]
impl PaymentStore for PaymentRepository {
    async fn insert_payment(&self, payment: Payment) -> Result<()> {
        self.payment_collection.insert_one(payment, None).await?;
        Ok(())
    }
}
