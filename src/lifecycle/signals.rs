//! OS signal handling.
//!
//! SIGINT (Ctrl+C) and, on Unix, SIGTERM stop the service.

use crate::lifecycle::shutdown::Shutdown;

/// Wait for a stop signal, then trigger `shutdown`.
pub async fn forward_stop_signal(shutdown: &Shutdown) {
    let signal = wait_for_stop().await;
    tracing::info!(signal, "Captured stop signal, shutting down");
    shutdown.trigger();
}

/// Resolves with the name of the first stop signal received.
pub async fn wait_for_stop() -> &'static str {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = ctrl_c => name,
        name = terminate => name,
    }
}
