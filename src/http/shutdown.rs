//! Graceful shutdown on SIGTERM/SIGINT.
//!
//! Orchestrators send SIGTERM before killing a pod. The listener stops
//! accepting connections and in-flight responses may finish within the
//! configured grace period.

use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::sync::Notify;

/// Install SIGINT/SIGTERM handlers and return a future that resolves on the
/// first of them.
///
/// Handlers are registered before this returns, so a signal delivered while
/// the listener is still binding is not lost.
#[cfg(unix)]
pub fn shutdown_signal() -> io::Result<impl Future<Output = ()> + Send + 'static> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown");
            }
            _ = terminate.recv() => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
            }
        }
    })
}

#[cfg(not(unix))]
pub fn shutdown_signal() -> io::Result<impl Future<Output = ()> + Send + 'static> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, initiating graceful shutdown"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    })
}

/// Resolves `grace` after `signalled` fires. Never resolves otherwise.
pub async fn grace_deadline(signalled: &Notify, grace: Duration) {
    signalled.notified().await;
    tracing::info!(
        grace_secs = grace.as_secs(),
        "Graceful shutdown initiated, waiting for connections to close"
    );
    tokio::time::sleep(grace).await;
}
