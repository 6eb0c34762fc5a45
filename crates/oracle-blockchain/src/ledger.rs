use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::BlockchainError;

pub use alloy::primitives::TxHash;

/// One registry record exactly as `viewSubmissions()` returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSubmission {
    pub poap_nft_id: U256,
    pub deployed_contract_address: String,
    pub tutorial_name: String,
    pub status: String,
}

/// Ledger operations the oracle needs.
///
/// Reads may lag behind writes: a status written by
/// [`update_submission_status`](Self::update_submission_status) is not
/// guaranteed to be visible to the next
/// [`view_submissions`](Self::view_submissions) call.
#[async_trait]
pub trait SubmissionLedger: Send + Sync {
    /// All records of the submissions registry.
    async fn view_submissions(&self) -> Result<Vec<RawSubmission>, BlockchainError>;

    /// Calls `getValue(input)` on a submitted tutorial contract.
    async fn probe_value(&self, contract: Address, input: U256) -> Result<U256, BlockchainError>;

    /// Sends a signed `updateSubmissionStatus` transaction to the registry.
    async fn update_submission_status(
        &self,
        poap_nft_id: U256,
        tutorial_name: &str,
        status: &str,
    ) -> Result<TxHash, BlockchainError>;

    /// Sends a signed `payout` transaction to the payout contract.
    async fn payout(&self, poap_nft_id: U256, tutorial_name: &str)
    -> Result<TxHash, BlockchainError>;
}
