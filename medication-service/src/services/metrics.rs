//! Metrics module for medication-service.
//! Provides Prometheus metrics for medication operations and chat generation.

use once_cell::sync::Lazy;
use prometheus::{
    histogram_opts, opts, register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec,
    IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Database query duration histogram
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "medication_db_query_duration_seconds",
            "Database query duration"
        ),
        &["operation"]
    )
    .expect("Failed to register DB_QUERY_DURATION")
});

/// Medication operations counter
pub static MEDICATION_OPERATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Chat generation counter
pub static CHAT_GENERATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Call once at startup.
pub fn init_metrics() {
    MEDICATION_OPERATIONS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "medication_operations_total",
                "Total medication operations by operation type and outcome"
            ),
            &["operation", "outcome"]
        )
        .expect("Failed to register MEDICATION_OPERATIONS_TOTAL")
    });

    CHAT_GENERATIONS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "chat_generations_total",
                "Total chat generation requests by outcome"
            ),
            &["outcome"]
        )
        .expect("Failed to register CHAT_GENERATIONS_TOTAL")
    });
}

/// Record a medication operation outcome.
pub fn record_medication_operation(operation: &str, outcome: &str) {
    if let Some(counter) = MEDICATION_OPERATIONS_TOTAL.get() {
        counter.with_label_values(&[operation, outcome]).inc();
    }
}

/// Record a chat generation outcome.
pub fn record_chat_generation(outcome: &str) {
    if let Some(counter) = CHAT_GENERATIONS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

/// Render all registered metrics in Prometheus text exposition format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
