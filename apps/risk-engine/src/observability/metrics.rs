//! Metrics for batch execution and worker pool lifecycle.

use metrics::{counter, gauge, histogram};

use crate::pool::PoolState;

/// Record a completed (or failed) batch.
///
/// # Arguments
///
/// * `strategy` - Strategy name (e.g., "SEQUENTIAL", "PARALLEL_SHARED")
/// * `status` - "ok" or "error"
/// * `size` - Number of portfolios in the batch
/// * `seconds` - Wall-clock duration of the batch
pub fn record_batch(strategy: &str, status: &str, size: usize, seconds: f64) {
    counter!(
        "risk_batches_total",
        "strategy" => strategy.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    counter!("risk_portfolios_total", "strategy" => strategy.to_string())
        .increment(size as u64);

    histogram!("risk_batch_duration_seconds", "strategy" => strategy.to_string())
        .record(seconds);
}

/// Record a submission that ran on the submitting thread.
pub fn record_caller_runs() {
    counter!("risk_pool_caller_runs_total").increment(1);
}

/// Record the current pool lifecycle state as a gauge (one series per state).
pub fn record_pool_state(state: PoolState) {
    for candidate in [
        PoolState::Created,
        PoolState::Running,
        PoolState::Draining,
        PoolState::Terminated,
        PoolState::ForcedStop,
    ] {
        let value = if candidate == state { 1.0 } else { 0.0 };
        gauge!("risk_pool_state", "state" => candidate.to_string()).set(value);
    }
}

/// Record a pool shutdown.
pub fn record_shutdown(outcome: &str, seconds: f64) {
    counter!("risk_pool_shutdowns_total", "outcome" => outcome.to_string()).increment(1);
    histogram!("risk_pool_shutdown_seconds").record(seconds);
}
