mod runner;
mod shutdown;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub(crate) use runner::run;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct RuntimeConfig {
    /// Pause between lifecycle passes. 0 runs a single pass and exits.
    pub poll_interval_secs: u64,
}

impl RuntimeConfig {
    /// `None` when only one pass should run.
    pub(crate) fn poll_interval(&self) -> Option<Duration> {
        (self.poll_interval_secs > 0).then(|| Duration::from_secs(self.poll_interval_secs))
    }
}
