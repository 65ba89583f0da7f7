use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use parking_lot::Condvar;
use parking_lot::Mutex;

/// A cloneable flag that stops a running simulation, waking it up if it is waiting between
/// generations.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;

        *lock.lock() = true;
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock()
    }

    /// Sleep for `timeout`, or until cancelled. Returns whether the token was cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut cancelled = lock.lock();

        match Instant::now().checked_add(timeout) {
            Some(deadline) => {
                cvar.wait_while_until(&mut cancelled, |cancelled| !*cancelled, deadline);
            }
            // too far out to represent, so only a cancel ends the wait
            None => cvar.wait_while(&mut cancelled, |cancelled| !*cancelled),
        }

        *cancelled
    }
}
