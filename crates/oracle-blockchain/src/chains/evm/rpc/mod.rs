use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::{
    chains::evm::EvmChain,
    error::BlockchainError,
    ledger::{RawSubmission, SubmissionLedger, TxHash},
};

mod payout;
mod probe;
mod submissions;

#[async_trait]
impl SubmissionLedger for EvmChain {
    async fn view_submissions(&self) -> Result<Vec<RawSubmission>, BlockchainError> {
        self.get_submissions().await
    }

    async fn probe_value(&self, contract: Address, input: U256) -> Result<U256, BlockchainError> {
        self.call_get_value(contract, input).await
    }

    async fn update_submission_status(
        &self,
        poap_nft_id: U256,
        tutorial_name: &str,
        status: &str,
    ) -> Result<TxHash, BlockchainError> {
        self.send_status_update(poap_nft_id, tutorial_name, status)
            .await
    }

    async fn payout(
        &self,
        poap_nft_id: U256,
        tutorial_name: &str,
    ) -> Result<TxHash, BlockchainError> {
        self.send_payout(poap_nft_id, tutorial_name).await
    }
}
