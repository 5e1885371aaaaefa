//! Prometheus metrics for the election ledger.
//!
//! All metrics follow the naming convention: `el_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // TRANSACTION METRICS
    // =========================================================================

    /// Committed transactions
    pub static ref TRANSACTIONS_COMMITTED: CounterVec = CounterVec::new(
        Opts::new("el_tx_committed_total", "Transactions committed to the ledger"),
        &["component", "function"]
    ).expect("metric creation failed");

    /// Rejected transactions by error kind
    pub static ref TRANSACTIONS_REJECTED: CounterVec = CounterVec::new(
        Opts::new("el_tx_rejected_total", "Transactions rejected during simulation or commit"),
        &["component", "kind"]  // kind: validation/not_found/conflict/...
    ).expect("metric creation failed");

    /// Commits rejected by MVCC or phantom validation
    pub static ref COMMIT_CONFLICTS: Counter = Counter::new(
        "el_commit_conflicts_total",
        "Commits rejected because a read went stale"
    ).expect("metric creation failed");

    /// Re-simulations after a commit conflict
    pub static ref COMMIT_RETRIES: Counter = Counter::new(
        "el_commit_retries_total",
        "Operations re-simulated after a commit conflict"
    ).expect("metric creation failed");

    // =========================================================================
    // ELECTION METRICS
    // =========================================================================

    pub static ref VOTES_CAST: Counter = Counter::new(
        "el_votes_cast_total",
        "Votes counted"
    ).expect("metric creation failed");

    pub static ref PERMITS_ISSUED: Counter = Counter::new(
        "el_permits_issued_total",
        "Voter permits issued"
    ).expect("metric creation failed");

    pub static ref PERMITS_SPENT: Counter = Counter::new(
        "el_permits_spent_total",
        "Voter permits redeemed"
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Registering twice is not an error.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(TRANSACTIONS_COMMITTED.clone()),
        Box::new(TRANSACTIONS_REJECTED.clone()),
        Box::new(COMMIT_CONFLICTS.clone()),
        Box::new(COMMIT_RETRIES.clone()),
        Box::new(VOTES_CAST.clone()),
        Box::new(PERMITS_ISSUED.clone()),
        Box::new(PERMITS_SPENT.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
