use std::time::Instant;

use alloy::{
    contract::{CallBuilder, CallDecoder, Error as ContractError},
    network::Ethereum,
    providers::{PendingTransactionBuilder, Provider},
    rpc::types::TransactionReceipt,
};
use tokio::sync::{Mutex, RwLock, RwLockReadGuard};

use crate::{
    BlockchainConfig, Network,
    chains::evm::{
        contracts::Contracts,
        provider::{BlockchainProvider, initialize_provider},
        transactions::send_until_accepted,
    },
    error::BlockchainError,
    ledger::TxHash,
    rpc_executor::{RetryPolicy, RetryableError, backoff_delay},
    rpc_rate_limiter::RpcRateLimiter,
};

mod contracts;
mod error_decode;
mod provider;
mod rpc;
mod transactions;

use error_decode::decode_contract_error;

/// Live connection to the registry and payout contracts on one network.
pub struct EvmChain {
    config: BlockchainConfig,
    provider: RwLock<BlockchainProvider>,
    contracts: RwLock<Contracts>,

    rpc_rate_limiter: RpcRateLimiter,
    tx_mutex: Mutex<()>,
    provider_refresh_mutex: Mutex<()>,
    rpc_retry_policy: RetryPolicy,
    tx_retry_policy: RetryPolicy,
}

impl EvmChain {
    pub async fn connect(config: BlockchainConfig) -> Result<Self, BlockchainError> {
        let provider = initialize_provider(&config).await?;
        let contracts = Contracts::new(
            &provider,
            config.registry_address(),
            config.payout_address(),
        );
        tracing::info!(
            network = %config.network(),
            wallet = %config.wallet_address(),
            registry = %config.registry_address(),
            payout = %config.payout_address(),
            max_rpc_requests_per_second = ?config.max_rpc_requests_per_second(),
            wait_for_receipt = config.wait_for_receipt(),
            "Ledger client ready"
        );

        let rpc_rate_limiter = RpcRateLimiter::new(config.max_rpc_requests_per_second());

        Ok(Self {
            provider: RwLock::new(provider),
            contracts: RwLock::new(contracts),
            config,
            rpc_rate_limiter,
            tx_mutex: Mutex::new(()),
            provider_refresh_mutex: Mutex::new(()),
            rpc_retry_policy: RetryPolicy::rpc_default(),
            tx_retry_policy: RetryPolicy::tx_default(),
        })
    }

    pub fn network(&self) -> Network {
        self.config.network()
    }

    pub(crate) async fn provider(&self) -> BlockchainProvider {
        self.provider.read().await.clone()
    }

    pub(crate) async fn contracts(&self) -> RwLockReadGuard<'_, Contracts> {
        self.contracts.read().await
    }

    /// Runs a read under the rate limit.
    ///
    /// Transient failures are retried with backoff; when the backend went away
    /// the provider is rebuilt before the next attempt.
    pub(crate) async fn rpc_call<T, E, F, O>(&self, mut operation: F) -> Result<T, E>
    where
        E: RetryableError,
        F: FnMut() -> O,
        O: std::future::IntoFuture<Output = Result<T, E>>,
    {
        let network = self.network().as_str();
        let policy = &self.rpc_retry_policy;
        let mut attempt = 1;
        loop {
            self.rpc_rate_limiter.acquire().await;
            let started = Instant::now();
            let result = operation().into_future().await;
            let status = if result.is_ok() { "ok" } else { "error" };
            oracle_observability::record_blockchain_rpc_call(network, status, started.elapsed());

            let err = match result {
                Ok(value) => return Ok(value),
                Err(err) if attempt < policy.max_attempts && err.is_retryable() => err,
                Err(err) => return Err(err),
            };

            if err.should_refresh_provider() {
                self.reconnect().await;
            }

            let delay = backoff_delay(policy, attempt, err.backoff_hint());
            tracing::warn!(
                network,
                attempt,
                max_attempts = policy.max_attempts,
                delay_ms = delay.as_millis(),
                error = %err,
                "Ledger read failed; retrying"
            );
            oracle_observability::record_blockchain_rpc_retry(network);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Node `gasPrice` quote for the next transaction.
    async fn gas_price(&self) -> Result<u128, BlockchainError> {
        let gas_price = self
            .rpc_call(|| async {
                let provider = self.provider().await;
                provider.get_gas_price().await
            })
            .await?;
        Ok(gas_price)
    }

    /// Signs and sends one contract call, one transaction in flight at a time.
    ///
    /// The gas price comes from the node; gas limit and nonce are filled by
    /// the provider. With `wait_for_receipt` the call only returns once the
    /// receipt is in, and a reverted receipt is an error. Otherwise the hash
    /// of the accepted transaction is returned.
    pub(crate) async fn send_transaction<D, F>(
        &self,
        contract: &'static str,
        function: &'static str,
        mut build_call: F,
    ) -> Result<TxHash, BlockchainError>
    where
        D: CallDecoder,
        F: FnMut() -> CallBuilder<BlockchainProvider, D, Ethereum>,
    {
        let _guard = self.tx_mutex.lock().await;
        let gas_price = self.gas_price().await?;
        let network = self.network();

        let sent = send_until_accepted(network.as_str(), &self.tx_retry_policy, || {
            let call = build_call().gas_price(gas_price);
            async move {
                self.rpc_rate_limiter.acquire().await;
                call.send().await
            }
        })
        .await;

        let pending_tx = match sent {
            Ok(pending_tx) => pending_tx,
            Err(err) => return Err(self.contract_call_failed(contract, function, err)),
        };

        if !self.config.wait_for_receipt() {
            return Ok(*pending_tx.tx_hash());
        }

        let receipt = self.await_receipt(pending_tx).await?;
        if !receipt.status() {
            return Err(BlockchainError::TransactionReverted {
                contract,
                function,
                tx_hash: receipt.transaction_hash,
            });
        }

        Ok(receipt.transaction_hash)
    }

    fn contract_call_failed(
        &self,
        contract: &'static str,
        function: &'static str,
        err: ContractError,
    ) -> BlockchainError {
        tracing::error!(
            network = %self.network(),
            contract,
            function,
            decoded_error = ?decode_contract_error(&err),
            error = %err,
            "Transaction not accepted"
        );
        BlockchainError::Contract(err)
    }

    async fn await_receipt(
        &self,
        pending_tx: PendingTransactionBuilder<Ethereum>,
    ) -> Result<TransactionReceipt, BlockchainError> {
        let network = self.network().as_str();
        let tx_hash = *pending_tx.tx_hash();
        let started = Instant::now();

        let result = pending_tx
            .with_required_confirmations(self.config.tx_confirmations())
            .with_timeout(self.config.tx_receipt_timeout())
            .get_receipt()
            .await;
        let status = if result.is_ok() { "ok" } else { "error" };
        oracle_observability::record_blockchain_tx_stage(network, "receipt", status, started.elapsed());

        result.map_err(|err| {
            tracing::error!(network, %tx_hash, error = %err, "No receipt for transaction");
            BlockchainError::ReceiptFailed {
                reason: err.to_string(),
            }
        })
    }

    /// Rebuilds provider and contract handles. A failure keeps the old ones.
    async fn reconnect(&self) {
        let _guard = self.provider_refresh_mutex.lock().await;

        let provider = match initialize_provider(&self.config).await {
            Ok(provider) => provider,
            Err(error) => {
                tracing::error!(network = %self.network(), %error, "Reconnect failed");
                return;
            }
        };
        let contracts = Contracts::new(
            &provider,
            self.config.registry_address(),
            self.config.payout_address(),
        );

        *self.provider.write().await = provider;
        *self.contracts.write().await = contracts;
        tracing::info!(network = %self.network(), "Reconnected to ledger");
    }
}
