//! Stripe charge client.
//!
//! Uses the Charges API (`POST /v1/charges`) with a card token from
//! Stripe checkout as the charge source.

use crate::config::StripeConfig;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;

use super::store::{Charge, ChargeGateway, ChargeRequest};

#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    config: StripeConfig,
}

/// Charge object returned by Stripe.
#[derive(Debug, Deserialize)]
pub struct StripeCharge {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub paid: bool,
}

#[derive(Debug, Deserialize)]
pub struct StripeError {
    pub error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct StripeErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub code: Option<String>,
    pub message: Option<String>,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.config.secret_key.expose_secret().is_empty()
    }
}

#[async_trait]
impl ChargeGateway for StripeClient {
    async fn create_charge(&self, request: ChargeRequest) -> Result<Charge> {
        if !self.is_configured() {
            return Err(anyhow!("Stripe credentials not configured"));
        }

        let url = format!("{}/charges", self.config.api_base_url);
        let form = [
            ("amount", request.amount.to_string()),
            ("currency", request.currency.clone()),
            ("source", request.source.clone()),
            ("metadata[order_id]", request.order_id.clone()),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, "Stripe create_charge response");

        if status.is_success() {
            let charge: StripeCharge = serde_json::from_str(&body)?;
            tracing::info!(
                charge_id = %charge.id,
                amount = charge.amount,
                currency = %charge.currency,
                charge_status = %charge.status,
                paid = charge.paid,
                "Stripe charge created"
            );
            Ok(Charge {
                id: charge.id,
                amount: charge.amount,
                currency: charge.currency,
            })
        } else {
            let error: StripeError = serde_json::from_str(&body).unwrap_or_else(|_| StripeError {
                error: StripeErrorDetail {
                    kind: "unknown".to_string(),
                    code: None,
                    message: Some(body.clone()),
                },
            });
            tracing::error!(
                status = %status,
                kind = %error.error.kind,
                code = ?error.error.code,
                "Stripe charge failed"
            );
            Err(anyhow!(
                "Stripe error ({}): {}",
                error.error.kind,
                error.error.message.unwrap_or_default()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    #[test]
    fn test_is_configured() {
        let client = StripeClient::new(StripeConfig {
            secret_key: Secret::new("sk_test_123".to_string()),
            api_base_url: "https://api.stripe.com/v1".to_string(),
            currency: "usd".to_string(),
        });
        assert!(client.is_configured());

        let client = StripeClient::new(StripeConfig {
            secret_key: Secret::new(String::new()),
            api_base_url: String::new(),
            currency: "usd".to_string(),
        });
        assert!(!client.is_configured());
    }

    #[tokio::test]
    async fn unconfigured_client_refuses_to_charge() {
        let client = StripeClient::new(StripeConfig {
            secret_key: Secret::new(String::new()),
            api_base_url: "http://127.0.0.1:9".to_string(),
            currency: "usd".to_string(),
        });

        let result = client
            .create_charge(ChargeRequest {
                amount: 100,
                currency: "usd".to_string(),
                source: "tok_visa".to_string(),
                order_id: "order-1".to_string(),
            })
            .await;
        assert!(result.is_err());
    }
}
