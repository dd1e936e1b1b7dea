use crate::domain::model::ShutdownReason;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::Notify;

struct Inner {
    requested: AtomicBool,
    reason: OnceLock<ShutdownReason>,
    notify: Notify,
}

/// Shared shutdown flag between the signal listener and the idle loop.
///
/// The first `request` wins and records its reason; every later request is
/// a no-op. Clones share the same state.
#[derive(Clone)]
pub struct ShutdownFlag {
    inner: Arc<Inner>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                requested: AtomicBool::new(false),
                reason: OnceLock::new(),
                notify: Notify::new(),
            }),
        }
    }

    /// Requests shutdown. Returns `false` when a shutdown was already in progress.
    pub fn request(&self, reason: ShutdownReason) -> bool {
        let first = self
            .inner
            .requested
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();

        if first {
            // Only the winning request reaches this point, so set cannot fail.
            let _ = self.inner.reason.set(reason);
            self.inner.notify.notify_waiters();
        }

        first
    }

    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    pub fn reason(&self) -> Option<ShutdownReason> {
        self.inner.reason.get().cloned()
    }

    /// Resolves once shutdown has been requested.
    pub async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent request is not missed.
            let notified = self.inner.notify.notified();
            if self.is_requested() {
                return;
            }
            notified.await;
        }
    }
}

impl Default for ShutdownFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShutdownFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownFlag")
            .field("requested", &self.is_requested())
            .field("reason", &self.inner.reason.get())
            .finish()
    }
}
