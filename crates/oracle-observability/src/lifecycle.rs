use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Records one finished sweep (`validation` or `payout`).
pub fn record_sweep(sweep: &str, status: &str, duration: Duration) {
    counter!(
        "oracle_sweep_runs_total",
        "sweep" => sweep.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "oracle_sweep_duration_seconds",
        "sweep" => sweep.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub fn record_sweep_candidates(sweep: &str, candidates: usize) {
    gauge!(
        "oracle_sweep_candidates",
        "sweep" => sweep.to_string()
    )
    .set(candidates as f64);
}

pub fn record_validation_result(result: &str) {
    counter!(
        "oracle_validation_results_total",
        "result" => result.to_string()
    )
    .increment(1);
}

pub fn record_status_update(status: &str, outcome: &str, attempts: usize) {
    counter!(
        "oracle_status_updates_total",
        "status" => status.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    histogram!(
        "oracle_status_update_attempts",
        "status" => status.to_string()
    )
    .record(attempts as f64);
}

pub fn record_payout(outcome: &str) {
    counter!(
        "oracle_payouts_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}
