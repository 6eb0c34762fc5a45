//! In-memory collaborators for lifecycle tests.

mod fake_ledger;
mod sleeper;

pub(crate) use fake_ledger::{FakeLedger, raw_submission};
pub(crate) use sleeper::RecordingSleeper;
