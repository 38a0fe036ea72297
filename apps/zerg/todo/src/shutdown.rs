use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Shutdown coordinator shared by the signal listener and the server host.
///
/// Backed by a `watch` channel, so a subscriber that arrives after shutdown
/// was triggered still observes it. Triggering is idempotent.
#[derive(Clone, Debug)]
pub struct ShutdownCoordinator {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Check if shutdown has been initiated.
    pub fn is_shutting_down(&self) -> bool {
        *self.tx.borrow()
    }

    /// Initiate shutdown and notify all subscribers.
    ///
    /// Returns `true` only for the call that actually initiated it.
    pub fn shutdown(&self) -> bool {
        let initiated = self.tx.send_if_modified(|shutting_down| {
            if *shutting_down {
                false
            } else {
                *shutting_down = true;
                true
            }
        });

        if initiated {
            info!("Initiating graceful shutdown");
        }
        initiated
    }

    /// Resolve once shutdown has been initiated (immediately if it already was).
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|shutting_down| *shutting_down).await;
    }

    /// Listen for SIGINT and SIGTERM for the life of the process.
    ///
    /// The first signal initiates shutdown; later ones are logged and ignored.
    /// Spawn this on its own task.
    pub async fn listen_for_signals(self) {
        let mut ctrl_c_available = true;

        #[cfg(unix)]
        let mut terminate = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(stream) => Some(stream),
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                None
            }
        };

        loop {
            let ctrl_c = async move {
                if ctrl_c_available {
                    signal::ctrl_c().await
                } else {
                    std::future::pending().await
                }
            };

            #[cfg(unix)]
            let sigterm = async {
                match terminate.as_mut() {
                    Some(stream) => {
                        if stream.recv().await.is_none() {
                            std::future::pending::<()>().await
                        }
                    }
                    None => std::future::pending::<()>().await,
                }
            };

            #[cfg(not(unix))]
            let sigterm = std::future::pending::<()>();

            tokio::select! {
                result = ctrl_c => match result {
                    Ok(()) => info!("Received SIGINT (Ctrl+C)"),
                    Err(e) => {
                        warn!(error = %e, "Failed to listen for Ctrl+C");
                        ctrl_c_available = false;
                        continue;
                    }
                },
                _ = sigterm => info!("Received SIGTERM"),
            }

            if !self.shutdown() {
                debug!("Shutdown already in progress, ignoring signal");
            }
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
