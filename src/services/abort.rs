//! External cancellation of a running investigation.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::errors::{DomainError, DomainResult};

/// Fires the abort signal. Cloneable; firing is idempotent.
#[derive(Debug, Clone)]
pub struct AbortHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl AbortHandle {
    pub fn abort(&self) {
        self.tx.send_replace(true);
    }
}

/// Observed by orchestrators at every transition and raced against
/// stage execution and checkpoint waits.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    rx: watch::Receiver<bool>,
}

/// Create a connected handle and signal.
pub fn abort_pair() -> (AbortHandle, AbortSignal) {
    let (tx, rx) = watch::channel(false);
    (AbortHandle { tx: Arc::new(tx) }, AbortSignal { rx })
}

impl AbortSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Fail with [`DomainError::Cancelled`] if the signal has fired.
    pub fn check(&self) -> DomainResult<()> {
        if self.is_aborted() {
            Err(DomainError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolve once the signal fires; pending forever if it never can.
    pub async fn aborted(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Run `fut` unless the signal fires first.
    pub async fn guard<T, F>(&self, fut: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        tokio::select! {
            biased;
            () = self.aborted() => Err(DomainError::Cancelled),
            result = fut => result,
        }
    }
}
