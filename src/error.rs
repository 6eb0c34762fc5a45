use oracle_blockchain::BlockchainError;
use oracle_domain::{SubmissionKey, SubmissionStatus};
use thiserror::Error;

/// A read against the ledger failed or returned something unusable.
#[derive(Error, Debug)]
pub(crate) enum LedgerReadError {
    #[error("Failed to read submissions registry: {0}")]
    Registry(#[source] BlockchainError),

    #[error("Invalid contract address '{address}' for submission {key}")]
    InvalidAddress { key: SubmissionKey, address: String },

    #[error("Probe of contract {contract} failed: {source}")]
    Probe {
        contract: String,
        #[source]
        source: BlockchainError,
    },
}

/// The write was accepted but a re-read did not show the requested status.
#[derive(Error, Debug)]
#[error(
    "Status of submission {key} not confirmed: expected {expected}, observed {}",
    .observed.map_or("nothing".to_string(), |status| status.to_string())
)]
pub(crate) struct StatusConfirmationError {
    pub key: SubmissionKey,
    pub expected: SubmissionStatus,
    /// `None` when the submission was missing from the re-read.
    pub observed: Option<SubmissionStatus>,
}

#[derive(Error, Debug)]
pub(crate) enum StatusUpdateError {
    #[error("Illegal status transition for submission {key}: {from} -> {to}")]
    IllegalTransition {
        key: SubmissionKey,
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    #[error("Status write for submission {key} failed: {source}")]
    Write {
        key: SubmissionKey,
        #[source]
        source: BlockchainError,
    },

    #[error("Confirming read failed: {0}")]
    ConfirmRead(#[from] LedgerReadError),

    #[error(transparent)]
    Unconfirmed(#[from] StatusConfirmationError),
}

#[derive(Error, Debug)]
#[error("Payout for submission {key} failed: {source}")]
pub(crate) struct PayoutDispatchError {
    pub key: SubmissionKey,
    #[source]
    pub source: BlockchainError,
}
