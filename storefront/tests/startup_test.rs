use secrecy::Secret;
use service_core::config::Config;
use storefront::config::{OrdersServiceSettings, Settings};
use storefront::Application;

fn settings(host: &str) -> Settings {
    Settings {
        common: Config {
            host: host.to_string(),
            port: 0,
        },
        service_name: "storefront".to_string(),
        log_level: "info".to_string(),
        otlp_endpoint: None,
        jwt_key: Secret::new("test-jwt-key".to_string()),
        orders_service: OrdersServiceSettings {
            url: "http://127.0.0.1:1".to_string(),
        },
    }
}

#[tokio::test]
async fn listener_binds_to_configured_host() {
    let app = Application::build(settings("127.0.0.1")).await.unwrap();

    assert!(app.address().ip().is_loopback());
    assert_ne!(app.port(), 0);
}

#[tokio::test]
async fn unresolvable_host_fails_to_build() {
    assert!(Application::build(settings("not a host")).await.is_err());
}
