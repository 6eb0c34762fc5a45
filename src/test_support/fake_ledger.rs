#![allow(clippy::unwrap_used)]

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use alloy::transports::TransportErrorKind;
use async_trait::async_trait;
use oracle_blockchain::{
    Address, BlockchainError, RawSubmission, SubmissionLedger, TxHash, U256, normalize_address,
};

pub(crate) fn raw_submission(id: u64, address: &str, tutorial_name: &str, status: &str) -> RawSubmission {
    RawSubmission {
        poap_nft_id: U256::from(id),
        deployed_contract_address: address.to_string(),
        tutorial_name: tutorial_name.to_string(),
        status: status.to_string(),
    }
}

type Key = (U256, String);

#[derive(Debug)]
struct PendingWrite {
    key: Key,
    status: String,
    /// Reads that still observe the old value.
    reads_left: usize,
}

#[derive(Debug, Default)]
struct State {
    records: Vec<RawSubmission>,
    pending: Vec<PendingWrite>,
    read_lag: usize,
    dropped_writes_left: usize,
    never_lands: HashSet<String>,
    failing_reads_left: usize,
    fail_writes: bool,
    probes: HashMap<Address, U256>,
    failing_payouts: HashSet<Key>,

    reads: usize,
    probe_calls: usize,
    status_writes: Vec<(U256, String, String)>,
    payouts: Vec<(U256, String)>,
    next_tx: u64,
}

impl State {
    fn next_tx_hash(&mut self) -> TxHash {
        self.next_tx += 1;
        TxHash::left_padding_from(&self.next_tx.to_be_bytes())
    }

    fn apply_due_writes(&mut self) {
        let mut still_pending = Vec::new();
        for mut write in std::mem::take(&mut self.pending) {
            if write.reads_left > 0 {
                write.reads_left -= 1;
                still_pending.push(write);
                continue;
            }
            if let Some(record) = self
                .records
                .iter_mut()
                .find(|r| r.poap_nft_id == write.key.0 && r.tutorial_name == write.key.1)
            {
                record.status = write.status;
            }
        }
        self.pending = still_pending;
    }
}

/// Registry, payout and probe contracts in memory.
///
/// Accepted status writes become visible after `read_lag` further reads, can
/// be dropped entirely, and reads or payouts can be made to fail.
#[derive(Debug, Default)]
pub(crate) struct FakeLedger {
    state: Mutex<State>,
}

impl FakeLedger {
    pub(crate) fn new(records: Vec<RawSubmission>) -> Self {
        Self {
            state: Mutex::new(State {
                records,
                ..State::default()
            }),
        }
    }

    /// `getValue` on `address` returns `value`. Unknown addresses revert.
    pub(crate) fn with_probe(self, address: &str, value: u64) -> Self {
        let address = normalize_address(address).unwrap();
        self.state
            .lock()
            .unwrap()
            .probes
            .insert(address, U256::from(value));
        self
    }

    pub(crate) fn with_read_lag(self, reads: usize) -> Self {
        self.state.lock().unwrap().read_lag = reads;
        self
    }

    /// The next `count` status writes are accepted but never applied.
    pub(crate) fn dropping_writes(self, count: usize) -> Self {
        self.state.lock().unwrap().dropped_writes_left = count;
        self
    }

    /// Writes of `status` are accepted but never applied.
    pub(crate) fn never_landing(self, status: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .never_lands
            .insert(status.to_string());
        self
    }

    pub(crate) fn failing_reads(self, count: usize) -> Self {
        self.state.lock().unwrap().failing_reads_left = count;
        self
    }

    pub(crate) fn failing_writes(self) -> Self {
        self.state.lock().unwrap().fail_writes = true;
        self
    }

    pub(crate) fn failing_payout(self, id: u64, tutorial_name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_payouts
            .insert((U256::from(id), tutorial_name.to_string()));
        self
    }

    /// Current on-ledger status, ignoring read lag.
    pub(crate) fn status_of(&self, id: u64, tutorial_name: &str) -> String {
        let state = self.state.lock().unwrap();
        state
            .records
            .iter()
            .find(|r| r.poap_nft_id == U256::from(id) && r.tutorial_name == tutorial_name)
            .map(|r| r.status.clone())
            .unwrap()
    }

    pub(crate) fn status_writes(&self) -> Vec<(U256, String, String)> {
        self.state.lock().unwrap().status_writes.clone()
    }

    pub(crate) fn payouts(&self) -> Vec<(U256, String)> {
        self.state.lock().unwrap().payouts.clone()
    }

    pub(crate) fn reads(&self) -> usize {
        self.state.lock().unwrap().reads
    }

    pub(crate) fn probe_calls(&self) -> usize {
        self.state.lock().unwrap().probe_calls
    }
}

#[async_trait]
impl SubmissionLedger for FakeLedger {
    async fn view_submissions(&self) -> Result<Vec<RawSubmission>, BlockchainError> {
        let mut state = self.state.lock().unwrap();
        state.reads += 1;
        if state.failing_reads_left > 0 {
            state.failing_reads_left -= 1;
            return Err(TransportErrorKind::custom_str("registry read timed out").into());
        }
        state.apply_due_writes();
        Ok(state.records.clone())
    }

    async fn probe_value(&self, contract: Address, _input: U256) -> Result<U256, BlockchainError> {
        let mut state = self.state.lock().unwrap();
        state.probe_calls += 1;
        state
            .probes
            .get(&contract)
            .copied()
            .ok_or_else(|| {
                TransportErrorKind::custom_str(&format!("execution reverted at {contract}")).into()
            })
    }

    async fn update_submission_status(
        &self,
        poap_nft_id: U256,
        tutorial_name: &str,
        status: &str,
    ) -> Result<TxHash, BlockchainError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(TransportErrorKind::custom_str("nonce too low").into());
        }
        state
            .status_writes
            .push((poap_nft_id, tutorial_name.to_string(), status.to_string()));

        if state.dropped_writes_left > 0 {
            state.dropped_writes_left -= 1;
        } else if !state.never_lands.contains(status) {
            let reads_left = state.read_lag;
            state.pending.push(PendingWrite {
                key: (poap_nft_id, tutorial_name.to_string()),
                status: status.to_string(),
                reads_left,
            });
        }

        Ok(state.next_tx_hash())
    }

    async fn payout(
        &self,
        poap_nft_id: U256,
        tutorial_name: &str,
    ) -> Result<TxHash, BlockchainError> {
        let mut state = self.state.lock().unwrap();
        if state
            .failing_payouts
            .contains(&(poap_nft_id, tutorial_name.to_string()))
        {
            let tx_hash = state.next_tx_hash();
            return Err(BlockchainError::TransactionReverted {
                contract: "Payout",
                function: "payout",
                tx_hash,
            });
        }
        state
            .payouts
            .push((poap_nft_id, tutorial_name.to_string()));
        Ok(state.next_tx_hash())
    }
}
