//! Background Expiry Sweeper
//!
//! This module implements a background task that periodically scans the
//! engine for expired keys and removes them ("active expiry"). Reads already
//! hide expired keys ("lazy visibility"), so the sweeper exists purely to
//! reclaim memory held by keys nobody touches again.
//!
//! ## Design
//!
//! The sweeper runs as a Tokio task and:
//! 1. Waits for the configured interval (default: 1s) or a stop signal
//! 2. Runs one sweep pass ([`StorageEngine::cleanup_expired`])
//! 3. Logs how many keys were removed
//!
//! A pass that has already started always runs to completion; the stop
//! signal is only observed between passes.

use crate::config::StoreConfig;
use crate::storage::StorageEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

/// A handle to the running expiry sweeper.
///
/// When this handle is dropped, the sweeper task will be stopped.
#[derive(Debug)]
pub struct ExpirySweeper {
    /// Sender to signal shutdown
    shutdown_tx: watch::Sender<bool>,
}

impl ExpirySweeper {
    /// Starts the expiry sweeper as a background task.
    ///
    /// Must be called from within a Tokio runtime, with a non-zero interval.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use ttlkv::storage::{StorageEngine, ExpirySweeper};
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let engine = Arc::new(StorageEngine::new());
    /// let sweeper = ExpirySweeper::start(engine, Duration::from_secs(1));
    ///
    /// // Dropping the sweeper will stop it
    /// drop(sweeper);
    /// ```
    pub fn start(engine: Arc<StorageEngine>, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(sweeper_loop(engine, interval, shutdown_rx));

        info!(interval_ms = interval.as_millis() as u64, "Background expiry sweeper started");

        Self { shutdown_tx }
    }

    /// Stops the expiry sweeper.
    ///
    /// Calling this more than once is harmless. This is also called when the
    /// handle is dropped.
    pub fn stop(&self) {
        // send_replace never fails, even once the task has exited
        let was_running = !self.shutdown_tx.send_replace(true);
        if was_running {
            info!("Background expiry sweeper stopped");
        }
    }

    /// Returns true once [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        *self.shutdown_tx.borrow()
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The main sweeper loop.
async fn sweeper_loop(
    engine: Arc<StorageEngine>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; skip it so the first pass runs
    // one full interval after start.
    ticker.tick().await;

    loop {
        // A pending stop signal wins over a due tick.
        tokio::select! {
            biased;
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("Expiry sweeper received shutdown signal");
                    return;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        let expired = engine.cleanup_expired();

        if expired > 0 {
            debug!(
                expired = expired,
                keys_remaining = engine.len(),
                "Expired keys cleaned up"
            );
        } else {
            trace!("Sweep pass found no expired keys");
        }
    }
}

/// Starts the expiry sweeper with the interval from `config`.
pub fn start_expiry_sweeper(engine: Arc<StorageEngine>, config: &StoreConfig) -> ExpirySweeper {
    ExpirySweeper::start(engine, config.sweep_interval)
}
