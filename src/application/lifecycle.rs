use std::{sync::Arc, time::Instant};

use oracle_blockchain::SubmissionLedger;
use oracle_domain::SubmissionStatus;

use super::LifecycleConfig;
use crate::{
    error::LedgerReadError,
    services::{
        PayoutDispatcher, StatusUpdateOutcome, StatusUpdater, SubmissionRepository,
        SubmissionValidator,
    },
    utils::poll::Sleeper,
};

/// Per-sweep counters. Informational only; failures are already logged.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct SweepReport {
    /// Submissions in the sweep's precondition status.
    pub candidates: usize,
    /// Status updates confirmed on the ledger.
    pub confirmed: usize,
    /// Candidates left in their precondition status or with an unconfirmed update.
    pub failed: usize,
}

/// Drives submissions through `PENDING -> VALID | INVALID` and `VALID -> PAID`.
///
/// Each sweep re-reads the registry and only touches submissions still in its
/// precondition status, so passes can be repeated safely.
pub(crate) struct SubmissionLifecycle {
    repository: Arc<SubmissionRepository>,
    validator: SubmissionValidator,
    status_updater: StatusUpdater,
    payout_dispatcher: PayoutDispatcher,
}

impl SubmissionLifecycle {
    pub(crate) fn new(
        ledger: Arc<dyn SubmissionLedger>,
        config: &LifecycleConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let repository = Arc::new(SubmissionRepository::new(Arc::clone(&ledger)));
        Self {
            validator: SubmissionValidator::new(Arc::clone(&ledger), config.probe_input),
            status_updater: StatusUpdater::new(
                Arc::clone(&ledger),
                Arc::clone(&repository),
                sleeper,
                config.settle_policy(),
                config.max_write_attempts,
            ),
            payout_dispatcher: PayoutDispatcher::new(ledger),
            repository,
        }
    }

    /// Validation sweep followed by payout sweep. Never fails.
    pub(crate) async fn run(&self) {
        match timed("validation", self.validate_pending_submissions()).await {
            Ok(report) => tracing::info!(
                candidates = report.candidates,
                confirmed = report.confirmed,
                failed = report.failed,
                "Validation sweep finished"
            ),
            Err(error) => tracing::error!(error = %error, "Validation sweep failed"),
        }

        match timed("payout", self.pay_valid_submissions()).await {
            Ok(report) => tracing::info!(
                candidates = report.candidates,
                confirmed = report.confirmed,
                failed = report.failed,
                "Payout sweep finished"
            ),
            Err(error) => tracing::error!(error = %error, "Payout sweep failed"),
        }
    }

    /// Probes every `PENDING` submission and records the verdict.
    ///
    /// Only the initial fetch can fail the sweep. A submission whose probe
    /// fails stays `PENDING`.
    pub(crate) async fn validate_pending_submissions(&self) -> Result<SweepReport, LedgerReadError> {
        let pending: Vec<_> = self
            .repository
            .fetch_all()
            .await?
            .into_iter()
            .filter(|submission| submission.status == SubmissionStatus::Pending)
            .collect();

        let mut report = SweepReport {
            candidates: pending.len(),
            ..SweepReport::default()
        };
        oracle_observability::record_sweep_candidates("validation", report.candidates);

        for submission in &pending {
            let verdict = match self.validator.validate(submission).await {
                Ok(true) => SubmissionStatus::Valid,
                Ok(false) => SubmissionStatus::Invalid,
                Err(error) => {
                    oracle_observability::record_validation_result("error");
                    tracing::error!(
                        id = %submission.id,
                        tutorial_name = %submission.tutorial_name,
                        error = %error,
                        "Validation failed; submission stays PENDING"
                    );
                    report.failed += 1;
                    continue;
                }
            };
            oracle_observability::record_validation_result(&verdict.as_str().to_lowercase());
            tracing::info!(
                id = %submission.id,
                tutorial_name = %submission.tutorial_name,
                status = %verdict,
                "Submission validated"
            );

            if self
                .status_updater
                .update_status(submission, verdict)
                .await
                .is_confirmed()
            {
                report.confirmed += 1;
            } else {
                report.failed += 1;
            }
        }

        Ok(report)
    }

    /// Pays every `VALID` submission, then marks it `PAID`.
    ///
    /// A failed payout leaves the submission `VALID` for a later pass. A
    /// dispatched payout whose `PAID` update never lands is paid again by the
    /// next pass.
    pub(crate) async fn pay_valid_submissions(&self) -> Result<SweepReport, LedgerReadError> {
        let valid: Vec<_> = self
            .repository
            .fetch_all()
            .await?
            .into_iter()
            .filter(|submission| submission.status == SubmissionStatus::Valid)
            .collect();

        let mut report = SweepReport {
            candidates: valid.len(),
            ..SweepReport::default()
        };
        oracle_observability::record_sweep_candidates("payout", report.candidates);

        for submission in &valid {
            let payout_tx = match self.payout_dispatcher.dispatch_payout(submission).await {
                Ok(tx_hash) => tx_hash,
                Err(error) => {
                    tracing::error!(
                        id = %submission.id,
                        tutorial_name = %submission.tutorial_name,
                        error = %error,
                        "Payout failed; submission stays VALID"
                    );
                    report.failed += 1;
                    continue;
                }
            };

            match self
                .status_updater
                .update_status(submission, SubmissionStatus::Paid)
                .await
            {
                StatusUpdateOutcome::Confirmed { tx_hash, .. } => {
                    tracing::info!(
                        id = %submission.id,
                        tutorial_name = %submission.tutorial_name,
                        %payout_tx,
                        status_tx = %tx_hash,
                        "Submission paid"
                    );
                    report.confirmed += 1;
                }
                StatusUpdateOutcome::Failed { error, .. } => {
                    tracing::warn!(
                        id = %submission.id,
                        tutorial_name = %submission.tutorial_name,
                        %payout_tx,
                        error = %error,
                        "Payout sent but PAID not confirmed; the next pass pays again"
                    );
                    report.failed += 1;
                }
                StatusUpdateOutcome::Rejected(error) => {
                    tracing::error!(
                        id = %submission.id,
                        tutorial_name = %submission.tutorial_name,
                        %payout_tx,
                        error = %error,
                        "Payout sent but PAID refused"
                    );
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

async fn timed<F>(sweep: &'static str, future: F) -> Result<SweepReport, LedgerReadError>
where
    F: std::future::Future<Output = Result<SweepReport, LedgerReadError>>,
{
    let started = Instant::now();
    let result = future.await;
    let status = if result.is_ok() { "ok" } else { "error" };
    oracle_observability::record_sweep(sweep, status, started.elapsed());
    result
}
