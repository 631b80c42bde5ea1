//! Cancelable debounce timer.
//!
//! At most one timer is live per [`Debouncer`]. Scheduling a new action
//! aborts the previous timer, and dropping the debouncer aborts whatever is
//! still waiting. Cancellation stops the timer only: once it has fired, the
//! action runs detached and cannot be cancelled by this handle.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Scoped, cancelable single-slot timer.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels any pending timer and schedules `action` to run once the
    /// quiet period has elapsed.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detach so a later cancel() only ever hits the timer.
            tokio::spawn(action);
        }));
    }

    /// Aborts the pending timer, if any. Returns true if a timer was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let was_waiting = !handle.is_finished();
                handle.abort();
                was_waiting
            }
            None => false,
        }
    }

    /// True while a timer is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
