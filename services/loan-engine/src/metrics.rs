use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram,
    IntCounter, IntCounterVec, TextEncoder,
};

lazy_static! {
    // Business metrics - underwriting
    pub static ref CUSTOMERS_REGISTERED: IntCounter = register_int_counter!(
        "loan_engine_customers_registered_total",
        "Total customers registered"
    ).expect("metric can be created");

    pub static ref ELIGIBILITY_DECISIONS: IntCounterVec = register_int_counter_vec!(
        "loan_engine_eligibility_decisions_total",
        "Eligibility decisions by outcome",
        &["outcome"]
    ).expect("metric can be created");

    pub static ref LOANS_CREATED: IntCounter = register_int_counter!(
        "loan_engine_loans_created_total",
        "Total loans created"
    ).expect("metric can be created");

    pub static ref EVALUATION_DURATION: Histogram = register_histogram!(
        "loan_engine_evaluation_duration_seconds",
        "Eligibility evaluation duration in seconds, including storage reads",
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]
    ).expect("metric can be created");
}

/// Generate metrics output in Prometheus text format
pub fn metrics_handler() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
