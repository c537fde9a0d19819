//! Timeout listener for time-limited execution.

use crate::timeout::maybe_timeout;
use courier_core::{BoxError, EventArgs, Listener, Message};
use std::time::Duration;

/// A listener that wraps another listener with a deadline.
///
/// If the inner listener does not finish within the duration it is dropped
/// and the invocation fails with a [`TimeoutError`](courier_core::TimeoutError).
pub struct TimeoutListener<L> {
    inner: L,
    duration: Duration,
}

impl<L> TimeoutListener<L> {
    /// Create a new timeout listener.
    pub fn new(inner: L, duration: Duration) -> Self {
        Self { inner, duration }
    }

    /// Get the configured timeout duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Get a reference to the inner listener.
    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<T: Message, L: Listener<T>> Listener<T> for TimeoutListener<L> {
    async fn call(&self, args: EventArgs<T>) -> Result<(), BoxError> {
        match maybe_timeout(Some(self.duration), self.inner.call(args)).await {
            Ok(result) => result,
            Err(elapsed) => Err(Box::new(elapsed)),
        }
    }
}
