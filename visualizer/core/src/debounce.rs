//! Trailing-Edge Debouncing
//!
//! Rapid input (typing a bar count, dragging a slider) produces bursts of
//! requests. A [`Debouncer`] forwards only the last value of a burst, once
//! no newer value has arrived for the configured delay.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Default quiet period before a debounced value is applied
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Forwards the latest of a burst of values after a quiet period
///
/// Values are applied on a background tokio task. Dropping the debouncer
/// applies a value that is still pending, then stops the task.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
    delay: Duration,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn a debouncer that calls `apply` with each settled value
    ///
    /// Must be called from within a tokio runtime.
    pub fn new<F>(delay: Duration, mut apply: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        let task = tokio::spawn(async move {
            while let Some(first) = rx.recv().await {
                let mut pending = first;
                loop {
                    tokio::select! {
                        next = rx.recv() => match next {
                            Some(value) => {
                                trace!("Debounce window restarted");
                                pending = value;
                            }
                            None => {
                                apply(pending);
                                return;
                            }
                        },
                        () = tokio::time::sleep(delay) => {
                            apply(pending);
                            break;
                        }
                    }
                }
            }
        });

        Self { tx, task, delay }
    }

    /// Record a new value, restarting the quiet period
    ///
    /// Returns `false` if the background task is gone.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }

    /// Quiet period before a value is applied
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether the background task has stopped
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.task.is_finished()
    }
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}
