use std::{future::Future, time::Duration, time::Instant};

use tokio_util::sync::CancellationToken;

use super::{RuntimeConfig, shutdown};
use crate::application::SubmissionLifecycle;

/// Runs lifecycle passes until a shutdown signal, or once when no poll
/// interval is configured.
pub(crate) async fn run(lifecycle: SubmissionLifecycle, config: &RuntimeConfig, once: bool) {
    let interval = match config.poll_interval() {
        Some(interval) if !once => interval,
        _ => {
            run_pass(&lifecycle).await;
            return;
        }
    };

    let shutdown = CancellationToken::new();
    shutdown::cancel_on_signal(shutdown.clone());

    tracing::info!(
        interval_secs = interval.as_secs(),
        "Polling submissions registry"
    );
    let lifecycle = &lifecycle;
    run_with_shutdown("submission_lifecycle", shutdown, move || async move {
        run_pass(lifecycle).await;
        interval
    })
    .await;
}

async fn run_pass(lifecycle: &SubmissionLifecycle) {
    let started = Instant::now();
    lifecycle.run().await;
    oracle_observability::record_task_run("submission_lifecycle", "ok", started.elapsed());
}

/// Calls `run_once` until `shutdown` fires, sleeping the returned delay in
/// between. A pass in progress is never interrupted.
pub(crate) async fn run_with_shutdown<F, Fut>(
    task_name: &'static str,
    shutdown: CancellationToken,
    mut run_once: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = Duration>,
{
    loop {
        if shutdown.is_cancelled() {
            tracing::info!(task = task_name, "Periodic task shutting down");
            break;
        }
        let delay = run_once().await;
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.cancelled() => {
                tracing::info!(task = task_name, "Periodic task shutting down");
                break;
            }
        }
    }
}
