use alloy::primitives::U256;

use crate::{
    chains::evm::EvmChain,
    error::BlockchainError,
    ledger::{RawSubmission, TxHash},
};

impl EvmChain {
    pub(crate) async fn get_submissions(&self) -> Result<Vec<RawSubmission>, BlockchainError> {
        let submissions = self
            .rpc_call(|| async {
                let contracts = self.contracts().await;
                contracts.registry().viewSubmissions().call().await
            })
            .await?;

        Ok(submissions
            .into_iter()
            .map(|submission| RawSubmission {
                poap_nft_id: submission.poapNftId,
                deployed_contract_address: submission.deployedTestnetAddress,
                tutorial_name: submission.tutorialName,
                status: submission.status,
            })
            .collect())
    }

    pub(crate) async fn send_status_update(
        &self,
        poap_nft_id: U256,
        tutorial_name: &str,
        status: &str,
    ) -> Result<TxHash, BlockchainError> {
        let registry = self.contracts().await.registry().clone();

        let tx_hash = self
            .send_transaction("TutorialSubmission", "updateSubmissionStatus", || {
                registry
                    .updateSubmissionStatus(
                        poap_nft_id,
                        tutorial_name.to_string(),
                        status.to_string(),
                    )
                    .with_cloned_provider()
            })
            .await?;

        tracing::debug!(
            network = %self.network(),
            %poap_nft_id,
            tutorial_name,
            status,
            %tx_hash,
            "Status update transaction sent"
        );
        Ok(tx_hash)
    }
}
