use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Clone)]
pub struct Settings {
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub jwt_key: Secret<String>,
    pub orders_service: OrdersServiceSettings,
}

#[derive(Clone)]
pub struct OrdersServiceSettings {
    /// Base URL of the orders service, e.g. `http://orders-srv:3000`.
    pub url: String,
}

fn required(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::ConfigError(anyhow::anyhow!("{} must be set", name)))
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let common = core_config::Config::load()?;

    Ok(Settings {
        common,
        service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "storefront".to_string()),
        log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
        jwt_key: Secret::new(required("JWT_KEY")?),
        orders_service: OrdersServiceSettings {
            url: required("ORDERS_SERVICE_URL")?
                .trim_end_matches('/')
                .to_string(),
        },
    })
}
