use std::fmt;

use alloy::primitives::U256;

use crate::SubmissionStatus;

/// Composite key identifying a submission in the registry.
///
/// The same POAP NFT id may be submitted for several tutorials, so the id alone
/// is not unique. Ids are full `uint256` values as the registry stores them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionKey {
    pub id: U256,
    pub tutorial_name: String,
}

impl SubmissionKey {
    pub fn new(id: U256, tutorial_name: impl Into<String>) -> Self {
        Self {
            id,
            tutorial_name: tutorial_name.into(),
        }
    }
}

impl fmt::Display for SubmissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.id, self.tutorial_name)
    }
}

/// Read-only snapshot of one registry record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: U256,
    /// Address of the contract deployed for this submission, as stored on-chain.
    pub contract_address: String,
    pub tutorial_name: String,
    pub status: SubmissionStatus,
}

impl Submission {
    pub fn key(&self) -> SubmissionKey {
        SubmissionKey::new(self.id, self.tutorial_name.clone())
    }

    pub fn matches(&self, key: &SubmissionKey) -> bool {
        self.id == key.id && self.tutorial_name == key.tutorial_name
    }
}

impl fmt::Display for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "submission {}/{} ({}) at {}",
            self.id, self.tutorial_name, self.status, self.contract_address
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(id: u64, tutorial_name: &str) -> Submission {
        Submission {
            id: U256::from(id),
            contract_address: "0x0000000000000000000000000000000000000001".to_string(),
            tutorial_name: tutorial_name.to_string(),
            status: SubmissionStatus::Pending,
        }
    }

    #[test]
    fn key_match_requires_id_and_tutorial_name() {
        let first = submission(7, "PoapMultiplier");
        let same_id_other_tutorial = submission(7, "Greeter");

        assert!(first.matches(&first.key()));
        assert!(!same_id_other_tutorial.matches(&first.key()));
        assert!(!submission(8, "PoapMultiplier").matches(&first.key()));
    }

    #[test]
    fn key_display() {
        assert_eq!(SubmissionKey::new(U256::from(42), "T1").to_string(), "42/T1");
    }

    #[test]
    fn key_keeps_ids_beyond_128_bits() {
        let id = U256::from(u128::MAX) + U256::from(1u8);
        let key = SubmissionKey::new(id, "T1");

        assert_eq!(key.id, id);
        assert_eq!(key.to_string(), "340282366920938463463374607431768211456/T1");
    }
}
