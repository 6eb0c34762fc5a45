use alloy::primitives::U256;

use crate::{chains::evm::EvmChain, error::BlockchainError, ledger::TxHash};

impl EvmChain {
    pub(crate) async fn send_payout(
        &self,
        poap_nft_id: U256,
        tutorial_name: &str,
    ) -> Result<TxHash, BlockchainError> {
        let payout = self.contracts().await.payout().clone();

        let tx_hash = self
            .send_transaction("Payout", "payout", || {
                payout
                    .payout(poap_nft_id, tutorial_name.to_string())
                    .with_cloned_provider()
            })
            .await?;

        tracing::debug!(
            network = %self.network(),
            %poap_nft_id,
            tutorial_name,
            %tx_hash,
            "Payout transaction sent"
        );
        Ok(tx_hash)
    }
}
