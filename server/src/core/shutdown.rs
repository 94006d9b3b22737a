//! Centralized shutdown management

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::constants::SHUTDOWN_TIMEOUT_SECS;

/// Coordinates graceful shutdown between signal handlers and the server
#[derive(Clone)]
pub struct ShutdownService {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
    drain_timeout: Duration,
}

impl Default for ShutdownService {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownService {
    pub fn new() -> Self {
        Self::with_drain_timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS))
    }

    pub fn with_drain_timeout(drain_timeout: Duration) -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
            drain_timeout,
        }
    }

    /// Subscribe to shutdown signal
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.rx.clone()
    }

    /// Trigger shutdown
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    /// Check if shutdown was triggered
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for shutdown signal (for use with axum graceful shutdown)
    /// Returns an owned future that can be passed to graceful_shutdown
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.rx.clone();
        async move {
            let _ = rx.wait_for(|&v| v).await;
        }
    }

    /// Drive `serving` to completion, bounding it by the drain timeout once
    /// shutdown has been triggered.
    ///
    /// Returns `None` if in-flight work did not finish in time.
    pub async fn drain<F>(&self, serving: F) -> Option<F::Output>
    where
        F: Future,
    {
        tokio::pin!(serving);
        tokio::select! {
            out = &mut serving => return Some(out),
            _ = self.wait() => {}
        }

        tracing::debug!(
            timeout_secs = self.drain_timeout.as_secs(),
            "Waiting for in-flight requests"
        );
        match tokio::time::timeout(self.drain_timeout, serving).await {
            Ok(out) => Some(out),
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.drain_timeout.as_secs(),
                    "Timeout waiting for in-flight requests"
                );
                None
            }
        }
    }

    /// Install OS signal handlers and auto-trigger on Ctrl+C/SIGTERM
    pub fn install_signal_handlers(&self) {
        let service = self.clone();
        tokio::spawn(async move {
            let ctrl_c = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                    std::future::pending::<()>().await;
                }
            };

            #[cfg(unix)]
            let terminate = async {
                match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(mut signal) => {
                        signal.recv().await;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to install SIGTERM handler");
                        std::future::pending::<()>().await;
                    }
                }
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => tracing::debug!("Received Ctrl+C, shutting down"),
                _ = terminate => tracing::debug!("Received SIGTERM, shutting down"),
            }

            service.trigger();
        });
    }
}
