use std::time::Duration;

use oracle_blockchain::RetryPolicy;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Timing and probe settings of the submission lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct LifecycleConfig {
    /// Argument passed to `getValue` when probing a submitted contract.
    pub probe_input: u64,
    /// Settling delay after a status write, doubled per further wait.
    pub settle_delay_ms: u64,
    /// Upper bound for the settling delay.
    pub max_settle_delay_ms: u64,
    /// Confirming reads per write attempt.
    pub confirm_polls: usize,
    /// Write-and-confirm attempts per status update.
    pub max_write_attempts: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            probe_input: 1,
            settle_delay_ms: 5_000,
            max_settle_delay_ms: 5_000,
            confirm_polls: 1,
            max_write_attempts: 2,
        }
    }
}

impl LifecycleConfig {
    pub(crate) fn ensure_valid(&self) -> Result<(), ConfigError> {
        if self.confirm_polls == 0 {
            return Err(ConfigError::InvalidConfig(
                "lifecycle.confirm_polls must be at least 1".to_string(),
            ));
        }
        if self.max_write_attempts == 0 {
            return Err(ConfigError::InvalidConfig(
                "lifecycle.max_write_attempts must be at least 1".to_string(),
            ));
        }
        if self.max_settle_delay_ms < self.settle_delay_ms {
            return Err(ConfigError::InvalidConfig(format!(
                "lifecycle.max_settle_delay_ms ({}) must not be below settle_delay_ms ({})",
                self.max_settle_delay_ms, self.settle_delay_ms
            )));
        }
        Ok(())
    }

    pub(crate) fn settle_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.confirm_polls,
            base_delay: Duration::from_millis(self.settle_delay_ms),
            max_delay: Duration::from_millis(self.max_settle_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use oracle_blockchain::backoff_delay;

    use super::*;

    #[test]
    fn default_settling_is_a_constant_five_seconds() {
        let policy = LifecycleConfig::default().settle_policy();
        for attempt in 1..=4 {
            assert_eq!(backoff_delay(&policy, attempt, None), Duration::from_secs(5));
        }
    }

    #[test]
    fn settle_delay_grows_exponentially_up_to_cap() {
        let config = LifecycleConfig {
            settle_delay_ms: 1_000,
            max_settle_delay_ms: 6_000,
            ..LifecycleConfig::default()
        };
        let policy = config.settle_policy();
        let delays: Vec<_> = (1..=5)
            .map(|attempt| backoff_delay(&policy, attempt, None).as_millis())
            .collect();
        assert_eq!(delays, vec![1_000, 2_000, 4_000, 6_000, 6_000]);
    }

    #[test]
    fn rejects_empty_budgets() {
        let config = LifecycleConfig {
            confirm_polls: 0,
            ..LifecycleConfig::default()
        };
        assert!(config.ensure_valid().is_err());

        let config = LifecycleConfig {
            max_write_attempts: 0,
            ..LifecycleConfig::default()
        };
        assert!(config.ensure_valid().is_err());
    }

    #[test]
    fn rejects_cap_below_base_delay() {
        let config = LifecycleConfig {
            settle_delay_ms: 5_000,
            max_settle_delay_ms: 1_000,
            ..LifecycleConfig::default()
        };
        assert!(config.ensure_valid().is_err());
        assert!(LifecycleConfig::default().ensure_valid().is_ok());
    }
}
