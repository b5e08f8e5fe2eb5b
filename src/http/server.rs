//! Listener startup logic.
//!
//! Binding happens before serving so that an occupied port or an address the
//! process may not use is reported as a startup failure, not a runtime one.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::Notify;

use crate::config::AppConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Failed to install signal handlers: {0}")]
    Signal(#[source] std::io::Error),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// A bound TCP socket that has not started serving yet.
#[derive(Debug)]
pub struct Listener {
    inner: tokio::net::TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Bind `addr`, failing immediately if the port is taken or not permitted.
    pub async fn bind(addr: SocketAddr) -> Result<Self, ServerError> {
        let bind_err = |source: std::io::Error| ServerError::Bind { addr, source };

        let inner = tokio::net::TcpListener::bind(addr).await.map_err(bind_err)?;
        let local_addr = inner.local_addr().map_err(bind_err)?;

        Ok(Self { inner, local_addr })
    }

    /// The address actually bound (resolves port 0 to the assigned port).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve `app` until `shutdown` resolves, then wait for open connections.
    pub async fn serve<F>(self, app: Router, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.inner, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }

    /// Serve `app` until `signal` resolves, then give open connections `grace`
    /// to finish. Returns `Ok(())` either when they drain or when `grace` elapses.
    pub async fn serve_with_grace<F>(
        self,
        app: Router,
        signal: F,
        grace: Duration,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let signalled = Arc::new(Notify::new());
        let notify = signalled.clone();

        let serve = self.serve(app, async move {
            signal.await;
            notify.notify_one();
        });

        tokio::select! {
            result = serve => result?,
            _ = shutdown::grace_deadline(&signalled, grace) => {
                tracing::warn!(
                    grace_ms = grace.as_millis() as u64,
                    "Grace period elapsed with connections still open, exiting"
                );
            }
        }

        Ok(())
    }
}

/// Bind the configured address and serve `app` until SIGTERM/SIGINT.
///
/// After the signal, open connections get `http.shutdown_grace_seconds` to
/// finish. This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr = config.http.socket_addr().map_err(|e| {
        ServerError::InvalidAddress(format!("{}:{}: {}", config.http.host, config.http.port, e))
    })?;

    let signal = shutdown::shutdown_signal().map_err(ServerError::Signal)?;

    let listener = Listener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr(), "Listening on http://{}", listener.local_addr());

    let grace = Duration::from_secs(config.http.shutdown_grace_seconds);
    listener.serve_with_grace(app, signal, grace).await?;

    tracing::info!("Server stopped");
    Ok(())
}
