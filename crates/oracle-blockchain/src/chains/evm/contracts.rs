use alloy::{primitives::Address, sol};

use super::provider::BlockchainProvider;

sol! {
    /// Registry of tutorial submissions and their review status.
    #[derive(Debug)]
    #[sol(rpc)]
    contract TutorialSubmission {
        struct Submission {
            uint256 poapNftId;
            string deployedTestnetAddress;
            string tutorialName;
            string status;
        }

        function viewSubmissions() external view returns (Submission[] memory);

        function updateSubmissionStatus(uint256 poapNftId, string memory tutorialName, string memory status) external;
    }
}

sol! {
    /// Rewards the owner of a POAP NFT for a validated tutorial.
    #[derive(Debug)]
    #[sol(rpc)]
    contract Payout {
        function payout(uint256 poapNftId, string memory tutorialName) external;
    }
}

sol! {
    /// Interface every submitted tutorial contract must implement.
    #[derive(Debug)]
    #[sol(rpc)]
    contract PoapMultiplier {
        function getValue(uint256 input) external view returns (uint256);
    }
}

pub(crate) struct Contracts {
    registry: TutorialSubmission::TutorialSubmissionInstance<BlockchainProvider>,
    payout: Payout::PayoutInstance<BlockchainProvider>,
}

impl Contracts {
    pub(crate) fn new(
        provider: &BlockchainProvider,
        registry_address: Address,
        payout_address: Address,
    ) -> Self {
        Self {
            registry: TutorialSubmission::new(registry_address, provider.clone()),
            payout: Payout::new(payout_address, provider.clone()),
        }
    }

    pub(crate) fn registry(
        &self,
    ) -> &TutorialSubmission::TutorialSubmissionInstance<BlockchainProvider> {
        &self.registry
    }

    pub(crate) fn payout(&self) -> &Payout::PayoutInstance<BlockchainProvider> {
        &self.payout
    }
}
