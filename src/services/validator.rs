use std::sync::Arc;

use oracle_blockchain::{SubmissionLedger, U256, normalize_address, to_checksum};
use oracle_domain::Submission;

use crate::error::LedgerReadError;

/// Decides whether a submitted contract behaves like the tutorial asks.
///
/// The tutorial contract multiplies its input by the submitter's POAP NFT id,
/// so probing with `1` must echo the id back.
pub(crate) struct SubmissionValidator {
    ledger: Arc<dyn SubmissionLedger>,
    probe_input: U256,
}

impl SubmissionValidator {
    pub(crate) fn new(ledger: Arc<dyn SubmissionLedger>, probe_input: u64) -> Self {
        Self {
            ledger,
            probe_input: U256::from(probe_input),
        }
    }

    pub(crate) async fn validate(&self, submission: &Submission) -> Result<bool, LedgerReadError> {
        let contract = normalize_address(&submission.contract_address).map_err(|_| {
            LedgerReadError::InvalidAddress {
                key: submission.key(),
                address: submission.contract_address.clone(),
            }
        })?;

        let returned = self
            .ledger
            .probe_value(contract, self.probe_input)
            .await
            .map_err(|source| LedgerReadError::Probe {
                contract: to_checksum(&contract),
                source,
            })?;

        let valid = returned == submission.id;
        tracing::debug!(
            id = %submission.id,
            tutorial_name = %submission.tutorial_name,
            contract = %to_checksum(&contract),
            %returned,
            valid,
            "Probed submission contract"
        );
        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use oracle_domain::SubmissionStatus;

    use super::*;
    use crate::test_support::FakeLedger;

    const ADDR: &str = "0x00000000000000000000000000000000000000aa";

    fn submission(id: u64, address: &str) -> Submission {
        Submission {
            id: U256::from(id),
            contract_address: address.to_string(),
            tutorial_name: "T1".to_string(),
            status: SubmissionStatus::Pending,
        }
    }

    #[tokio::test]
    async fn echoed_id_is_valid() {
        let ledger = Arc::new(FakeLedger::new(vec![]).with_probe(ADDR, 1));
        let validator = SubmissionValidator::new(ledger, 1);

        assert!(validator.validate(&submission(1, ADDR)).await.unwrap());
        assert!(!validator.validate(&submission(2, ADDR)).await.unwrap());
    }

    #[tokio::test]
    async fn validation_is_deterministic() {
        let ledger = Arc::new(FakeLedger::new(vec![]).with_probe(ADDR, 2));
        let validator = SubmissionValidator::new(ledger.clone(), 1);
        let snapshot = submission(1, ADDR);

        let first = validator.validate(&snapshot).await.unwrap();
        let second = validator.validate(&snapshot).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(ledger.probe_calls(), 2);
    }

    #[tokio::test]
    async fn malformed_address_never_reaches_the_ledger() {
        let ledger = Arc::new(FakeLedger::new(vec![]));
        let validator = SubmissionValidator::new(ledger.clone(), 1);

        let result = validator.validate(&submission(1, "not-an-address")).await;

        assert!(matches!(
            result,
            Err(LedgerReadError::InvalidAddress { ref address, .. }) if address == "not-an-address"
        ));
        assert_eq!(ledger.probe_calls(), 0);
    }

    #[tokio::test]
    async fn reverting_probe_is_a_read_error() {
        let ledger = Arc::new(FakeLedger::new(vec![]));
        let validator = SubmissionValidator::new(ledger, 1);

        assert!(matches!(
            validator.validate(&submission(1, ADDR)).await,
            Err(LedgerReadError::Probe { .. })
        ));
    }
}
