use std::sync::Arc;

use oracle_blockchain::{RetryPolicy, SubmissionLedger, TxHash, backoff_delay};
use oracle_domain::{Submission, SubmissionKey, SubmissionStatus};

use super::SubmissionRepository;
use crate::{
    error::{StatusConfirmationError, StatusUpdateError},
    utils::poll::{PollOutcome, Sleeper, poll_until},
};

#[derive(Debug)]
pub(crate) enum StatusUpdateOutcome {
    /// A re-read showed the requested status.
    Confirmed { attempts: usize, tx_hash: TxHash },
    /// Gave up; the ledger may or may not carry the new status.
    Failed {
        attempts: usize,
        error: StatusUpdateError,
    },
    /// Not a legal transition; nothing was written.
    Rejected(StatusUpdateError),
}

impl StatusUpdateOutcome {
    pub(crate) fn is_confirmed(&self) -> bool {
        matches!(self, StatusUpdateOutcome::Confirmed { .. })
    }

    fn label(&self) -> &'static str {
        match self {
            StatusUpdateOutcome::Confirmed { .. } => "confirmed",
            StatusUpdateOutcome::Failed { .. } => "failed",
            StatusUpdateOutcome::Rejected(_) => "rejected",
        }
    }

    fn attempts(&self) -> usize {
        match self {
            StatusUpdateOutcome::Confirmed { attempts, .. }
            | StatusUpdateOutcome::Failed { attempts, .. } => *attempts,
            StatusUpdateOutcome::Rejected(_) => 0,
        }
    }
}

/// Writes a status and confirms it by re-reading the registry.
///
/// One attempt is a write followed by up to `settle.max_attempts` confirming
/// reads, each preceded by a settling delay. Only a confirmation mismatch
/// leads to another attempt.
pub(crate) struct StatusUpdater {
    ledger: Arc<dyn SubmissionLedger>,
    repository: Arc<SubmissionRepository>,
    sleeper: Arc<dyn Sleeper>,
    settle: RetryPolicy,
    max_write_attempts: usize,
}

impl StatusUpdater {
    pub(crate) fn new(
        ledger: Arc<dyn SubmissionLedger>,
        repository: Arc<SubmissionRepository>,
        sleeper: Arc<dyn Sleeper>,
        settle: RetryPolicy,
        max_write_attempts: usize,
    ) -> Self {
        Self {
            ledger,
            repository,
            sleeper,
            settle,
            max_write_attempts,
        }
    }

    pub(crate) async fn update_status(
        &self,
        submission: &Submission,
        new_status: SubmissionStatus,
    ) -> StatusUpdateOutcome {
        let outcome = self.run_update(submission, new_status).await;
        oracle_observability::record_status_update(
            new_status.as_str(),
            outcome.label(),
            outcome.attempts(),
        );
        outcome
    }

    async fn run_update(
        &self,
        submission: &Submission,
        new_status: SubmissionStatus,
    ) -> StatusUpdateOutcome {
        let key = submission.key();

        if !submission.status.can_transition_to(new_status) {
            let error = StatusUpdateError::IllegalTransition {
                key,
                from: submission.status,
                to: new_status,
            };
            tracing::warn!(error = %error, "Refusing status update");
            return StatusUpdateOutcome::Rejected(error);
        }

        let mut attempt = 1;
        loop {
            match self.write_and_confirm(&key, new_status).await {
                Ok(tx_hash) => {
                    tracing::info!(
                        id = %key.id,
                        tutorial_name = %key.tutorial_name,
                        status = %new_status,
                        %tx_hash,
                        attempt,
                        "Submission status confirmed"
                    );
                    return StatusUpdateOutcome::Confirmed {
                        attempts: attempt,
                        tx_hash,
                    };
                }
                Err(StatusUpdateError::Unconfirmed(error)) if attempt < self.max_write_attempts => {
                    let delay = backoff_delay(&self.settle, attempt, None);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_write_attempts,
                        delay_ms = delay.as_millis(),
                        error = %error,
                        "Status not visible yet; writing again"
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => {
                    tracing::error!(
                        id = %key.id,
                        tutorial_name = %key.tutorial_name,
                        status = %new_status,
                        attempt,
                        error = %error,
                        "Giving up on status update"
                    );
                    return StatusUpdateOutcome::Failed {
                        attempts: attempt,
                        error,
                    };
                }
            }
        }
    }

    async fn write_and_confirm(
        &self,
        key: &SubmissionKey,
        new_status: SubmissionStatus,
    ) -> Result<TxHash, StatusUpdateError> {
        let tx_hash = self
            .ledger
            .update_submission_status(key.id, &key.tutorial_name, new_status.as_str())
            .await
            .map_err(|source| StatusUpdateError::Write {
                key: key.clone(),
                source,
            })?;

        tracing::debug!(
            id = %key.id,
            tutorial_name = %key.tutorial_name,
            status = %new_status,
            %tx_hash,
            "Status write accepted; waiting for it to settle"
        );

        let outcome = poll_until(
            &self.settle,
            self.sleeper.as_ref(),
            || self.repository.find(key),
            |found| found.as_ref().is_some_and(|s| s.status == new_status),
        )
        .await?;

        match outcome {
            PollOutcome::Satisfied { polls, .. } => {
                tracing::debug!(id = %key.id, tutorial_name = %key.tutorial_name, polls, "Status visible");
                Ok(tx_hash)
            }
            PollOutcome::Exhausted { last, .. } => Err(StatusConfirmationError {
                key: key.clone(),
                expected: new_status,
                observed: last.flatten().map(|s| s.status),
            }
            .into()),
        }
    }
}
