//! Shutdown coordination.
//!
//! [`Shutdown`] owns a one-way token; [`ShutdownSignal`] is the cheap,
//! clonable read side handed to transports. [`SignalGuard`] listens for
//! Ctrl-C / SIGTERM and trips the token; dropping the guard stops listening.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Owner side of the shutdown token.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Get a signal that resolves once shutdown is triggered.
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger shutdown. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Read side of the shutdown token.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Wait until shutdown is triggered.
    ///
    /// If the owning [`Shutdown`] is dropped without triggering, this never
    /// resolves.
    pub async fn wait(&mut self) {
        if self.rx.wait_for(|triggered| *triggered).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }
}

/// Scoped OS signal listener.
///
/// While alive, Ctrl-C (and SIGTERM on unix) trigger the shutdown token.
/// Dropping the guard aborts the listener task, which releases the signal
/// streams it holds.
#[derive(Debug)]
pub struct SignalGuard {
    task: JoinHandle<()>,
}

impl SignalGuard {
    /// Start listening for termination signals.
    pub fn install(shutdown: &Shutdown) -> std::io::Result<Self> {
        let tx = shutdown.tx.clone();

        #[cfg(unix)]
        let mut terminate =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

        let task = tokio::spawn(async move {
            #[cfg(unix)]
            let reason = tokio::select! {
                res = tokio::signal::ctrl_c() => res.map(|_| "SIGINT"),
                _ = terminate.recv() => Ok("SIGTERM"),
            };
            #[cfg(not(unix))]
            let reason = tokio::signal::ctrl_c().await.map(|_| "Ctrl-C");

            match reason {
                Ok(name) => {
                    info!("Received {}, shutting down", name);
                    tx.send_replace(true);
                }
                Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
            }
        });

        Ok(Self { task })
    }
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}
