use std::sync::Arc;

use oracle_blockchain::{SubmissionLedger, TxHash};
use oracle_domain::Submission;

use crate::error::PayoutDispatchError;

/// Sends one `payout` transaction per call. Success means the node accepted
/// the transaction; nothing re-reads the ledger afterwards.
pub(crate) struct PayoutDispatcher {
    ledger: Arc<dyn SubmissionLedger>,
}

impl PayoutDispatcher {
    pub(crate) fn new(ledger: Arc<dyn SubmissionLedger>) -> Self {
        Self { ledger }
    }

    pub(crate) async fn dispatch_payout(
        &self,
        submission: &Submission,
    ) -> Result<TxHash, PayoutDispatchError> {
        let result = self
            .ledger
            .payout(submission.id, &submission.tutorial_name)
            .await;

        match result {
            Ok(tx_hash) => {
                oracle_observability::record_payout("ok");
                tracing::info!(
                    id = %submission.id,
                    tutorial_name = %submission.tutorial_name,
                    %tx_hash,
                    "Payout dispatched"
                );
                Ok(tx_hash)
            }
            Err(source) => {
                oracle_observability::record_payout("error");
                Err(PayoutDispatchError {
                    key: submission.key(),
                    source,
                })
            }
        }
    }
}
