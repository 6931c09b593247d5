use service_core::observability::init_tracing;
use storefront::config::get_configuration;
use storefront::startup::Application;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        &configuration.service_name,
        &configuration.log_level,
        configuration.otlp_endpoint.as_deref(),
    )?;

    storefront::services::metrics::init_metrics()?;

    let app = Application::build(configuration).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Application build error: {}", e)
    })?;

    info!("Storefront listening on port {}", app.port());

    tokio::select! {
        result = app.run_until_stopped() => {
            result.map_err(|e| {
                tracing::error!("Server error: {}", e);
                anyhow::anyhow!("Server error: {}", e)
            })?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
