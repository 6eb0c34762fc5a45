mod chains;
mod config;
mod config_error;
mod error;
mod error_classification;
mod ledger;
mod rpc_executor;
mod rpc_rate_limiter;
mod utils;

pub use chains::evm::EvmChain;
pub use config::{BlockchainConfig, BlockchainConfigRaw, ContractAddressesRaw, Network};
pub use config_error::ConfigError;
pub use error::BlockchainError;
pub use ledger::{RawSubmission, SubmissionLedger, TxHash};
pub use rpc_executor::{RetryPolicy, backoff_delay};
pub use utils::{normalize_address, to_checksum};

pub use alloy::primitives::{Address, U256};
