//! Cancellable fixed-interval sleep between ticks.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;

/// Handle that stops a [`Ticker`].
///
/// Cloneable so a signal listener and tests can both hold one.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Request shutdown. The ticker returns at its next wait; a tick in
    /// progress is allowed to finish.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Sleeps a fixed period between ticks unless cancelled.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    cancel: watch::Receiver<bool>,
}

/// Create a ticker and the handle that cancels it.
pub fn ticker(period: Duration) -> (Shutdown, Ticker) {
    let (tx, rx) = watch::channel(false);
    (Shutdown { tx: Arc::new(tx) }, Ticker { period, cancel: rx })
}

impl Ticker {
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Resolve once shutdown has been requested.
    pub async fn cancelled(&mut self) {
        cancelled(&mut self.cancel).await
    }

    /// Sleep one period.
    ///
    /// Returns `true` when the period elapsed and the loop should run again,
    /// `false` once shutdown has been requested.
    pub async fn wait(&mut self) -> bool {
        if self.is_cancelled() {
            return false;
        }
        let interrupted = tokio::select! {
            _ = time::sleep(self.period) => false,
            _ = cancelled(&mut self.cancel) => true,
        };
        !interrupted && !self.is_cancelled()
    }
}

async fn cancelled(rx: &mut watch::Receiver<bool>) {
    // Every Shutdown handle dropped: nobody can cancel any more.
    if rx.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}
