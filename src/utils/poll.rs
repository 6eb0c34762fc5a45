//! Bounded poll-until-predicate with an injectable clock.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use oracle_blockchain::{RetryPolicy, backoff_delay};

#[async_trait]
pub(crate) trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PollOutcome<T> {
    Satisfied { value: T, polls: usize },
    /// Every poll ran without the predicate holding. `last` is the final value read.
    Exhausted { last: Option<T>, polls: usize },
}

/// Waits `backoff_delay(policy, n)` before the n-th read and stops at the
/// first value accepted by `done`, after at most `policy.max_attempts` reads.
///
/// A read error ends the poll immediately.
pub(crate) async fn poll_until<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut read: F,
    mut done: P,
) -> Result<PollOutcome<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: FnMut(&T) -> bool,
{
    let mut last = None;
    let mut polls = 0;

    for attempt in 1..=policy.max_attempts {
        sleeper.sleep(backoff_delay(policy, attempt, None)).await;
        let value = read().await?;
        polls = attempt;

        if done(&value) {
            return Ok(PollOutcome::Satisfied { value, polls });
        }
        last = Some(value);
    }

    Ok(PollOutcome::Exhausted { last, polls })
}
