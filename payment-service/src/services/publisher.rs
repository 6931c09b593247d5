//! Delivers payment events to the orders service as signed HTTP posts.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use service_core::events::PaymentEvent;
use service_core::observability::TracedClientExt;

use super::store::PaymentEventPublisher;

pub struct HttpEventPublisher {
    client: Client,
    url: String,
    secret: Secret<String>,
}

impl HttpEventPublisher {
    pub fn new(url: impl Into<String>, secret: Secret<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            secret,
        }
    }
}

#[async_trait]
impl PaymentEventPublisher for HttpEventPublisher {
    async fn publish(&self, event: PaymentEvent) -> Result<()> {
        let body = serde_json::to_vec(&event)?;
        let timestamp = chrono::Utc::now().timestamp();

        let response = self
            .client
            .traced_post(&self.url)
            .signed_json(self.secret.expose_secret(), timestamp, body)?
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Event delivery rejected with status {}", status));
        }

        tracing::info!(url = %self.url, "Payment event delivered");
        Ok(())
    }
}
