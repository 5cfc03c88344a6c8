//! # Expiration Sweeper
//!
//! Background task running [`ExpirationResolver::sweep`] on a fixed interval.
//!
//! The interval is a deployment parameter. Ticks missed while a sweep is
//! running are skipped rather than replayed.
//!
//! # Examples
//!
//! ```ignore
//! let sweeper = ExpirationSweeper::new(resolver, Duration::from_secs(300));
//! let handle = sweeper.spawn();
//! // ...
//! handle.shutdown().await;
//! ```

use crate::application::services::expiration::ExpirationResolver;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Periodic expiration sweep.
#[derive(Debug, Clone)]
pub struct ExpirationSweeper {
    resolver: Arc<ExpirationResolver>,
    interval: Duration,
}

impl ExpirationSweeper {
    /// Creates a sweeper.
    ///
    /// A zero interval is raised to one second.
    #[must_use]
    pub fn new(resolver: Arc<ExpirationResolver>, interval: Duration) -> Self {
        Self {
            resolver,
            interval: interval.max(Duration::from_secs(1)),
        }
    }

    /// Returns the sweep interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawns the sweep loop on the current tokio runtime.
    ///
    /// The first sweep runs immediately.
    #[must_use]
    pub fn spawn(self) -> SweeperHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        SweeperHandle { shutdown_tx, task }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_secs = self.interval.as_secs(), "expiration sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.resolver.sweep().await {
                        Ok(report) => debug!(%report, "sweep tick"),
                        Err(e) => error!(error = %e, "expiration sweep failed"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("expiration sweeper stopped");
    }
}

/// Handle to a running [`ExpirationSweeper`].
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the loop to stop and waits for it to finish.
    ///
    /// A sweep already in progress completes first.
    pub async fn shutdown(self) {
        // Send fails only when the loop has already exited.
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            error!(error = %e, "expiration sweeper task failed");
        }
    }

    /// Returns true once the loop has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
