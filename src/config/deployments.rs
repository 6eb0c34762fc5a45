//! Contract addresses recorded by the deploy scripts.
//!
//! ```json
//! { "testnet": { "deployed": [{ "name": "TutorialSubmission", "address": "0x..." }] } }
//! ```

use std::{collections::HashMap, path::Path};

use oracle_blockchain::{ContractAddressesRaw, Network};
use serde::Deserialize;

use super::ConfigError;

pub(crate) const REGISTRY_CONTRACT_NAME: &str = "TutorialSubmission";
pub(crate) const PAYOUT_CONTRACT_NAME: &str = "Payout";

#[derive(Debug, Deserialize)]
struct DeployedContract {
    name: String,
    address: String,
}

#[derive(Debug, Default, Deserialize)]
struct NetworkDeployments {
    #[serde(default)]
    deployed: Vec<DeployedContract>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub(crate) struct Deployments(HashMap<String, NetworkDeployments>);

impl Deployments {
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let failed = |reason: String| ConfigError::Deployments {
            path: path.display().to_string(),
            reason,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| failed(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| failed(e.to_string()))
    }

    pub(crate) fn address_of(&self, network: Network, name: &str) -> Option<&str> {
        self.0
            .get(network.as_str())?
            .deployed
            .iter()
            .find(|contract| contract.name == name)
            .map(|contract| contract.address.as_str())
    }

    /// Fills addresses the configuration left empty. Explicit addresses win.
    pub(crate) fn fill_missing(&self, network: Network, contracts: &mut ContractAddressesRaw) {
        if contracts.registry.is_none() {
            contracts.registry = self
                .address_of(network, REGISTRY_CONTRACT_NAME)
                .map(str::to_string);
        }
        if contracts.payout.is_none() {
            contracts.payout = self
                .address_of(network, PAYOUT_CONTRACT_NAME)
                .map(str::to_string);
        }
    }
}
