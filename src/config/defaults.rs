//! Typed default configuration for each network.

use std::net::SocketAddr;

use oracle_blockchain::{BlockchainConfigRaw, ContractAddressesRaw, Network};

use super::ConfigRaw;
use crate::{
    application::LifecycleConfig,
    logger::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig},
    runtime::RuntimeConfig,
};

pub(crate) const DEFAULT_DEPLOYMENTS_PATH: &str = "vars.json";

pub(crate) fn config_for(network: Network) -> ConfigRaw {
    match network {
        Network::Test => test(),
        Network::Localnet => localnet(),
        Network::Testnet => testnet(),
    }
}

fn logger() -> LoggerConfig {
    LoggerConfig {
        level: "info".to_string(),
        format: LogFormat::Pretty,
    }
}

fn telemetry() -> TelemetryConfig {
    TelemetryConfig {
        metrics: TelemetryMetricsConfig {
            enabled: false,
            bind_address: SocketAddr::from(([127, 0, 0, 1], 9464)),
        },
    }
}

fn blockchain(rpc_endpoint: &str) -> BlockchainConfigRaw {
    BlockchainConfigRaw {
        rpc_endpoints: vec![rpc_endpoint.to_string()],
        private_key: None,
        wallet_address: None,
        contracts: ContractAddressesRaw::default(),
        max_rpc_requests_per_second: None,
        wait_for_receipt: false,
        tx_confirmations: 1,
        tx_receipt_timeout_ms: 120_000,
    }
}

fn base(network: Network, rpc_endpoint: &str, poll_interval_secs: u64) -> ConfigRaw {
    ConfigRaw {
        network,
        deployments_path: DEFAULT_DEPLOYMENTS_PATH.into(),
        logger: logger(),
        telemetry: telemetry(),
        runtime: RuntimeConfig { poll_interval_secs },
        lifecycle: LifecycleConfig::default(),
        blockchain: blockchain(rpc_endpoint),
    }
}

// In-memory zkSync node used by the contract test suite. One pass per invocation.
fn test() -> ConfigRaw {
    base(Network::Test, "http://127.0.0.1:8011", 0)
}

fn localnet() -> ConfigRaw {
    base(Network::Localnet, "http://127.0.0.1:3050", 60)
}

fn testnet() -> ConfigRaw {
    let mut config = base(Network::Testnet, "https://zksync2-testnet.zksync.dev", 60);
    config.blockchain.wait_for_receipt = true;
    config.blockchain.max_rpc_requests_per_second = Some(10);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_network_defaults_to_its_own_node() {
        for network in Network::ALL {
            let config = config_for(network);
            assert_eq!(config.network, network);
            assert_eq!(config.blockchain.rpc_endpoints.len(), 1);
        }
        assert_eq!(
            config_for(Network::Localnet).blockchain.rpc_endpoints,
            vec!["http://127.0.0.1:3050".to_string()]
        );
    }

    #[test]
    fn test_network_runs_a_single_pass() {
        assert_eq!(config_for(Network::Test).runtime.poll_interval(), None);
        assert!(config_for(Network::Testnet).runtime.poll_interval().is_some());
    }

    #[test]
    fn defaults_never_carry_secrets() {
        for network in Network::ALL {
            assert!(config_for(network).blockchain.private_key.is_none());
        }
    }
}
