//! Configuration module for payment-service.

use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub stripe: StripeConfig,
    pub events: EventsConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub db_name: String,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HS256 key shared with the auth service for session JWTs.
    pub jwt_key: Secret<String>,
}

#[derive(Clone, Debug)]
pub struct StripeConfig {
    pub secret_key: Secret<String>,
    pub api_base_url: String,
    /// ISO currency code charged for every order.
    pub currency: String,
}

#[derive(Clone, Debug)]
pub struct EventsConfig {
    /// HMAC key for signed event deliveries in both directions.
    pub secret: Secret<String>,
    /// Where `payment:created` is delivered. Publishing is disabled when unset.
    pub orders_events_url: Option<String>,
}

fn required(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::ConfigError(anyhow::anyhow!("{} must be set", name)))
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "payment-service".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
            database: DatabaseConfig {
                url: Secret::new(required("MONGO_URI")?),
                db_name: env::var("MONGO_DATABASE").unwrap_or_else(|_| "payments".to_string()),
            },
            auth: AuthConfig {
                jwt_key: Secret::new(required("JWT_KEY")?),
            },
            stripe: StripeConfig {
                secret_key: Secret::new(required("STRIPE_KEY")?),
                api_base_url: env::var("STRIPE_API_BASE_URL")
                    .unwrap_or_else(|_| "https://api.stripe.com/v1".to_string()),
                currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "usd".to_string()),
            },
            events: EventsConfig {
                secret: Secret::new(required("EVENTS_SECRET")?),
                orders_events_url: env::var("ORDERS_EVENTS_URL")
                    .ok()
                    .filter(|url| !url.is_empty()),
            },
        })
    }
}
