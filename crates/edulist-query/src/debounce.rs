//! Debounced commits of rapidly changing input.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Collapses bursts of values into one commit after a quiet period.
///
/// Each [`Debouncer::push`] cancels the pending timer and starts a new one;
/// only a value that survives a full quiet period is delivered on the
/// receiver returned by [`Debouncer::new`]. Dropping the debouncer cancels any
/// pending commit.
///
/// Timers are Tokio tasks, so pushing must happen inside a Tokio runtime.
pub struct Debouncer<T> {
    delay: Duration,
    sender: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
    generation: Arc<AtomicU64>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer and the receiver that committed values arrive on.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            sender,
            pending: None,
            generation: Arc::new(AtomicU64::new(0)),
        };
        (debouncer, receiver)
    }

    /// Replace any pending value with `value` and restart the quiet period.
    pub fn push(&mut self, value: T) {
        self.cancel();

        let generation = self.generation.load(Ordering::SeqCst);
        let current = Arc::clone(&self.generation);
        let sender = self.sender.clone();
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) == generation {
                trace!("committing debounced value");
                // The receiver may already be gone; nothing is waiting then.
                let _ = sender.send(value);
            }
        }));
    }
}

impl<T> Debouncer<T> {
    /// Drop the pending value, if any. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.generation.fetch_add(1, Ordering::SeqCst);
        match self.pending.take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    /// True while a value is waiting for its quiet period to end.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}
