use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_blockchain_rpc_call(network: &str, status: &str, duration: Duration) {
    counter!(
        "oracle_blockchain_rpc_total",
        "network" => network.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "oracle_blockchain_rpc_duration_seconds",
        "network" => network.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub fn record_blockchain_rpc_retry(network: &str) {
    counter!(
        "oracle_blockchain_rpc_retries_total",
        "network" => network.to_string()
    )
    .increment(1);
}

pub fn record_blockchain_tx_stage(network: &str, stage: &str, status: &str, duration: Duration) {
    counter!(
        "oracle_blockchain_tx_stage_total",
        "network" => network.to_string(),
        "stage" => stage.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "oracle_blockchain_tx_stage_duration_seconds",
        "network" => network.to_string(),
        "stage" => stage.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub fn record_blockchain_tx_retry(network: &str, stage: &str) {
    counter!(
        "oracle_blockchain_tx_retries_total",
        "network" => network.to_string(),
        "stage" => stage.to_string()
    )
    .increment(1);
}
