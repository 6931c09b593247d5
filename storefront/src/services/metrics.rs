use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub static ORDER_LIST_RENDERS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

pub fn init_metrics() -> Result<(), prometheus::Error> {
    let registry = Registry::new();

    let renders_total = IntCounterVec::new(
        Opts::new(
            "storefront_order_list_renders_total",
            "Order list page renders by outcome",
        ),
        &["outcome"],
    )?;
    registry.register(Box::new(renders_total.clone()))?;

    let _ = REGISTRY.set(registry);
    let _ = ORDER_LIST_RENDERS_TOTAL.set(renders_total);
    Ok(())
}

pub fn record_render(outcome: &str) {
    if let Some(counter) = ORDER_LIST_RENDERS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn get_metrics() -> String {
    let Some(registry) = REGISTRY.get() else {
        return String::new();
    };

    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&registry.gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
