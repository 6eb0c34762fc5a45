use tokio::{select, signal::unix::SignalKind};
use tokio_util::sync::CancellationToken;

/// Cancels `shutdown` on SIGINT or SIGTERM.
pub(super) fn cancel_on_signal(shutdown: CancellationToken) {
    tokio::spawn(async move {
        let mut sigterm = match tokio::signal::unix::signal(SignalKind::terminate()) {
            Ok(signal) => signal,
            Err(error) => {
                tracing::error!(error = %error, "Failed to install SIGTERM handler");
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Received SIGINT, finishing current pass...");
                }
                shutdown.cancel();
                return;
            }
        };

        select! {
            _ = tokio::signal::ctrl_c() => tracing::info!("Received SIGINT, finishing current pass..."),
            _ = sigterm.recv() => tracing::info!("Received SIGTERM, finishing current pass..."),
        }
        shutdown.cancel();
    });
}
