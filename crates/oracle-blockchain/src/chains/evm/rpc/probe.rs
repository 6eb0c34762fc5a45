use alloy::primitives::{Address, U256};

use crate::{
    chains::evm::{EvmChain, contracts::PoapMultiplier},
    error::BlockchainError,
};

impl EvmChain {
    /// Read-only `getValue(input)` against a submitted contract. Submitted
    /// contracts are untrusted, so a revert or a missing function surfaces as
    /// an ordinary contract error.
    pub(crate) async fn call_get_value(
        &self,
        contract: Address,
        input: U256,
    ) -> Result<U256, BlockchainError> {
        let provider = self.provider().await;
        let tutorial = PoapMultiplier::new(contract, provider);
        let tutorial = &tutorial;

        let value = self
            .rpc_call(move || async move { tutorial.getValue(input).call().await })
            .await?;
        Ok(value)
    }
}
