use anyhow::{anyhow, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static PAYMENT_CHARGES_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static PAYMENT_AMOUNT_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Install the Prometheus recorder and register the payment counters.
///
/// Must be called once at startup; the record functions are no-ops until then.
pub fn init_metrics() -> Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow!("failed to install Prometheus recorder: {}", e))?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| anyhow!("metrics handle already initialized"))?;

    let registry = Registry::new();

    let charges_counter = IntCounterVec::new(
        Opts::new(
            "payment_charges_total",
            "Charge attempts by outcome (succeeded, refused, failed)",
        ),
        &["outcome"],
    )?;

    // Smallest currency unit
    let amount_counter = IntCounterVec::new(
        Opts::new(
            "payment_amount_total",
            "Total captured amount by currency (in smallest unit)",
        ),
        &["currency"],
    )?;

    registry.register(Box::new(charges_counter.clone()))?;
    registry.register(Box::new(amount_counter.clone()))?;

    PROMETHEUS_REGISTRY
        .set(registry)
        .map_err(|_| anyhow!("prometheus registry already initialized"))?;
    PAYMENT_CHARGES_TOTAL
        .set(charges_counter)
        .map_err(|_| anyhow!("payment_charges_total already initialized"))?;
    PAYMENT_AMOUNT_TOTAL
        .set(amount_counter)
        .map_err(|_| anyhow!("payment_amount_total already initialized"))?;

    Ok(())
}

pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}

pub fn record_charge(outcome: &str) {
    if let Some(counter) = PAYMENT_CHARGES_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn record_amount(currency: &str, amount: i64) {
    if let Some(counter) = PAYMENT_AMOUNT_TOTAL.get() {
        counter
            .with_label_values(&[currency])
            .inc_by(amount.max(0) as u64);
    }
}
