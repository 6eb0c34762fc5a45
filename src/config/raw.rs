use std::path::PathBuf;

use oracle_blockchain::{BlockchainConfig, BlockchainConfigRaw, Network};
use serde::{Deserialize, Serialize};

use crate::{
    application::LifecycleConfig,
    config::ConfigError,
    logger::{LoggerConfig, TelemetryConfig},
    runtime::RuntimeConfig,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigRaw {
    pub network: Network,
    /// Deploy script output consulted for contract addresses missing from
    /// `blockchain.contracts`.
    pub deployments_path: PathBuf,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
    pub runtime: RuntimeConfig,
    pub lifecycle: LifecycleConfig,
    pub blockchain: BlockchainConfigRaw,
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub network: Network,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
    pub runtime: RuntimeConfig,
    pub lifecycle: LifecycleConfig,
    pub blockchain: BlockchainConfig,
}

impl ConfigRaw {
    pub(crate) fn resolve(self) -> Result<Config, ConfigError> {
        self.lifecycle.ensure_valid()?;

        Ok(Config {
            network: self.network,
            logger: self.logger,
            telemetry: self.telemetry,
            runtime: self.runtime,
            lifecycle: self.lifecycle,
            blockchain: self.blockchain.resolve(self.network)?,
        })
    }
}
