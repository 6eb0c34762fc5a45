use std::sync::Arc;

use oracle_blockchain::{RawSubmission, SubmissionLedger};
use oracle_domain::{Submission, SubmissionKey, SubmissionStatus};

use crate::error::LedgerReadError;

/// Typed view over the registry's `viewSubmissions()`.
pub(crate) struct SubmissionRepository {
    ledger: Arc<dyn SubmissionLedger>,
}

impl SubmissionRepository {
    pub(crate) fn new(ledger: Arc<dyn SubmissionLedger>) -> Self {
        Self { ledger }
    }

    /// Every registry record, in registry order.
    ///
    /// Records with a status outside the lifecycle are skipped with a warning.
    pub(crate) async fn fetch_all(&self) -> Result<Vec<Submission>, LedgerReadError> {
        let raw = self
            .ledger
            .view_submissions()
            .await
            .map_err(LedgerReadError::Registry)?;

        let submissions: Vec<_> = raw.into_iter().filter_map(into_submission).collect();

        tracing::debug!(count = submissions.len(), "Fetched submissions");
        Ok(submissions)
    }

    /// Re-reads the registry and returns the entry for `key`, if any.
    pub(crate) async fn find(
        &self,
        key: &SubmissionKey,
    ) -> Result<Option<Submission>, LedgerReadError> {
        Ok(self
            .fetch_all()
            .await?
            .into_iter()
            .find(|submission| submission.matches(key)))
    }
}

fn into_submission(raw: RawSubmission) -> Option<Submission> {
    let status = match raw.status.parse::<SubmissionStatus>() {
        Ok(status) => status,
        Err(error) => {
            tracing::warn!(
                id = %raw.poap_nft_id,
                tutorial_name = %raw.tutorial_name,
                error = %error,
                "Skipping submission with unknown status"
            );
            return None;
        }
    };

    Some(Submission {
        id: raw.poap_nft_id,
        contract_address: raw.deployed_contract_address,
        tutorial_name: raw.tutorial_name,
        status,
    })
}
