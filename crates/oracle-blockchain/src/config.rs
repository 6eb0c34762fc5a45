use std::{fmt, str::FromStr, time::Duration};

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Named deployment target.
///
/// `test` is the in-memory node used by the contract test suite, `localnet`
/// the dockerized local setup and `testnet` the public zkSync testnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Test,
    Localnet,
    Testnet,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Test, Network::Localnet, Network::Testnet];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Test => "test",
            Network::Localnet => "localnet",
            Network::Testnet => "testnet",
        }
    }

    /// Environment variable holding the signing key for this network.
    pub fn private_key_env_var(&self) -> &'static str {
        match self {
            Network::Test => "WALLET_PRIVATE_KEY_TEST",
            Network::Localnet => "WALLET_PRIVATE_KEY_LOCALNET",
            Network::Testnet => "WALLET_PRIVATE_KEY_TESTNET",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "test" => Ok(Network::Test),
            "localnet" => Ok(Network::Localnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(ConfigError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Deployed contract addresses, by contract name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ContractAddressesRaw {
    /// `TutorialSubmission` registry contract.
    pub registry: Option<String>,
    /// `Payout` contract.
    pub payout: Option<String>,
}

/// Ledger connection settings as they appear in configuration files.
///
/// **Secret handling**: the signing key is resolved at config load time from
/// `private_key` or the network's `WALLET_PRIVATE_KEY_*` variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockchainConfigRaw {
    /// RPC endpoints (HTTP or WebSocket). Later entries are fallbacks.
    #[serde(default)]
    pub rpc_endpoints: Vec<String>,

    /// Private key of the oracle wallet, hex encoded.
    pub private_key: Option<String>,

    /// Expected wallet address. Derived from the private key when omitted.
    pub wallet_address: Option<String>,

    #[serde(default)]
    pub contracts: ContractAddressesRaw,

    /// Maximum RPC requests per second. `None` means unlimited.
    pub max_rpc_requests_per_second: Option<u32>,

    /// Wait for a receipt after each transaction instead of returning once
    /// the node accepted it.
    #[serde(default)]
    pub wait_for_receipt: bool,

    /// Confirmations to wait for when `wait_for_receipt` is set.
    pub tx_confirmations: u64,

    /// Receipt timeout in milliseconds. 0 disables the timeout.
    pub tx_receipt_timeout_ms: u64,
}

impl BlockchainConfigRaw {
    pub fn ensure_rpc_endpoints(&self) -> Result<(), ConfigError> {
        if self.rpc_endpoints.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "rpc_endpoints must include at least one endpoint".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ensure_max_rpc_requests_per_second(&self) -> Result<(), ConfigError> {
        if self.max_rpc_requests_per_second == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "max_rpc_requests_per_second must be greater than 0 when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn resolve(self, network: Network) -> Result<BlockchainConfig, ConfigError> {
        self.ensure_rpc_endpoints()?;
        self.ensure_max_rpc_requests_per_second()?;

        let private_key = self.private_key.ok_or_else(|| {
            ConfigError::MissingSecret(format!(
                "{} env var or blockchain.private_key config required",
                network.private_key_env_var()
            ))
        })?;
        let derived_address = derive_address_from_private_key(&private_key)?;

        if let Some(address) = self.wallet_address.as_deref() {
            let parsed = parse_address("wallet_address", address)?;
            if parsed != derived_address {
                return Err(ConfigError::InvalidConfig(format!(
                    "wallet_address does not match derived address: provided={}, derived={}",
                    address, derived_address
                )));
            }
        }

        let registry = self.contracts.registry.ok_or_else(|| {
            ConfigError::MissingContract("TutorialSubmission".to_string())
        })?;
        let payout = self
            .contracts
            .payout
            .ok_or_else(|| ConfigError::MissingContract("Payout".to_string()))?;

        Ok(BlockchainConfig {
            network,
            rpc_endpoints: self.rpc_endpoints,
            private_key,
            wallet_address: derived_address,
            registry_address: parse_address("contracts.registry", &registry)?,
            payout_address: parse_address("contracts.payout", &payout)?,
            max_rpc_requests_per_second: self.max_rpc_requests_per_second,
            wait_for_receipt: self.wait_for_receipt,
            tx_confirmations: self.tx_confirmations,
            tx_receipt_timeout_ms: self.tx_receipt_timeout_ms,
        })
    }
}

#[derive(Clone)]
pub struct BlockchainConfig {
    pub network: Network,
    pub rpc_endpoints: Vec<String>,
    pub private_key: String,
    pub wallet_address: Address,
    pub registry_address: Address,
    pub payout_address: Address,
    pub max_rpc_requests_per_second: Option<u32>,
    pub wait_for_receipt: bool,
    pub tx_confirmations: u64,
    pub tx_receipt_timeout_ms: u64,
}

impl BlockchainConfig {
    pub fn network(&self) -> Network {
        self.network
    }

    pub fn rpc_endpoints(&self) -> &[String] {
        &self.rpc_endpoints
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn wallet_address(&self) -> Address {
        self.wallet_address
    }

    pub fn registry_address(&self) -> Address {
        self.registry_address
    }

    pub fn payout_address(&self) -> Address {
        self.payout_address
    }

    pub fn max_rpc_requests_per_second(&self) -> Option<u32> {
        self.max_rpc_requests_per_second
    }

    pub fn wait_for_receipt(&self) -> bool {
        self.wait_for_receipt
    }

    pub fn tx_confirmations(&self) -> u64 {
        self.tx_confirmations
    }

    pub fn tx_receipt_timeout(&self) -> Option<Duration> {
        if self.tx_receipt_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.tx_receipt_timeout_ms))
        }
    }
}

// Keeps the private key out of logs.
impl fmt::Debug for BlockchainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockchainConfig")
            .field("network", &self.network)
            .field("rpc_endpoints", &self.rpc_endpoints)
            .field("private_key", &"<redacted>")
            .field("wallet_address", &self.wallet_address)
            .field("registry_address", &self.registry_address)
            .field("payout_address", &self.payout_address)
            .field(
                "max_rpc_requests_per_second",
                &self.max_rpc_requests_per_second,
            )
            .field("wait_for_receipt", &self.wait_for_receipt)
            .field("tx_confirmations", &self.tx_confirmations)
            .field("tx_receipt_timeout_ms", &self.tx_receipt_timeout_ms)
            .finish()
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address, ConfigError> {
    value.trim().parse::<Address>().map_err(|e| {
        ConfigError::InvalidConfig(format!("invalid address in {} '{}': {}", field, value, e))
    })
}

fn derive_address_from_private_key(private_key: &str) -> Result<Address, ConfigError> {
    let signer: PrivateKeySigner = private_key
        .trim()
        .parse()
        .map_err(|e| ConfigError::InvalidConfig(format!("invalid private key: {}", e)))?;
    Ok(signer.address())
}
