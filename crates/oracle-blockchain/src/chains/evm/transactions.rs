use std::{future::Future, time::Instant};

use alloy::contract::Error as ContractError;

use crate::{
    error_classification::{contract_error_backoff_hint, is_refused_send_error},
    rpc_executor::{RetryPolicy, backoff_delay},
};

/// Runs `send` until the node accepts the transaction.
///
/// A transaction may already be in the mempool when `send` reports a timeout
/// or a dropped connection, and a second `send` would go out under the next
/// nonce. Only refusals that prove nothing was broadcast are sent again.
/// Payouts rely on this: one dispatch broadcasts at most one `payout`.
pub(crate) async fn send_until_accepted<T, F, Fut>(
    network: &str,
    policy: &RetryPolicy,
    mut send: F,
) -> Result<T, ContractError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ContractError>>,
{
    let mut attempt = 1;
    loop {
        let started = Instant::now();
        match send().await {
            Ok(accepted) => {
                oracle_observability::record_blockchain_tx_stage(
                    network,
                    "send",
                    "ok",
                    started.elapsed(),
                );
                return Ok(accepted);
            }
            Err(err) => {
                oracle_observability::record_blockchain_tx_stage(
                    network,
                    "send",
                    "error",
                    started.elapsed(),
                );
                if attempt >= policy.max_attempts || !is_refused_send_error(&err) {
                    return Err(err);
                }

                let delay = backoff_delay(policy, attempt, contract_error_backoff_hint(&err));
                tracing::warn!(
                    network,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis(),
                    error = %err,
                    "Node refused transaction; sending again"
                );
                oracle_observability::record_blockchain_tx_retry(network, "send");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
