//! The caller's side of a one-shot waiter.

use super::state::{Shared, WaitOutcome, WaiterId};
use courier_core::{Message, Payload, WaitError};
use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::Weak,
    task::{Context, Poll},
    time::Duration,
};
use tokio::{
    sync::oneshot,
    time::{Instant, Sleep},
};

/// A pending `wait_for` registration.
///
/// Resolves to the canonicalized arguments of the first matching dispatch,
/// or fails with [`WaitError::Timeout`], [`WaitError::Predicate`] /
/// [`WaitError::PredicatePanicked`], or [`WaitError::Cancelled`]. Exactly one
/// of those outcomes ends each waiter.
///
/// The deadline starts when `wait_for` is called, not when the handle is
/// first polled: a dispatch arriving after it never resolves the waiter.
///
/// The delegate keeps the only record of the registration; this handle only
/// points back at it. Dropping the handle (or calling [`WaitFor::cancel`])
/// removes the registration, so an abandoned waiter never lingers.
#[must_use = "a waiter is removed as soon as its handle is dropped"]
pub struct WaitFor<T: Message> {
    delegate: Weak<Shared<T>>,
    name: String,
    id: WaiterId,
    receiver: oneshot::Receiver<WaitOutcome<T>>,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
    sleep: Option<Pin<Box<Sleep>>>,
    finished: bool,
}

impl<T: Message> WaitFor<T> {
    pub(crate) fn new(
        delegate: Weak<Shared<T>>,
        name: String,
        id: WaiterId,
        receiver: oneshot::Receiver<WaitOutcome<T>>,
        timeout: Option<Duration>,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            delegate,
            name,
            id,
            receiver,
            timeout,
            deadline,
            sleep: None,
            finished: false,
        }
    }

    /// The event name this waiter is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The timeout this waiter was created with.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Withdraw the waiter without waiting for an outcome.
    pub fn cancel(self) {
        drop(self);
    }

    fn deregister(&mut self) -> bool {
        let Some(delegate) = self.delegate.upgrade() else {
            return false;
        };
        let removed = delegate.state.lock().remove_waiter(&self.name, self.id);
        #[cfg(feature = "tracing")]
        if removed {
            tracing::debug!(
                delegate = delegate.config.label,
                event = %self.name,
                waiter = ?self.id,
                "waiter withdrawn"
            );
        }
        removed
    }

    /// The configured timeout, once its deadline has been reached.
    fn elapsed(&self) -> Option<Duration> {
        let deadline = self.deadline?;
        (Instant::now() >= deadline).then_some(self.timeout).flatten()
    }

    fn time_out(&mut self, timeout: Duration) -> Poll<Result<Payload<T>, WaitError>> {
        self.deregister();
        #[cfg(feature = "tracing")]
        tracing::debug!(event = %self.name, waiter = ?self.id, ?timeout, "waiter timed out");
        self.finish(Err(WaitError::Timeout(timeout)))
    }

    fn finish(&mut self, outcome: WaitOutcome<T>) -> Poll<Result<Payload<T>, WaitError>> {
        self.finished = true;
        Poll::Ready(outcome)
    }
}

impl<T: Message> Future for WaitFor<T> {
    type Output = Result<Payload<T>, WaitError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(Err(WaitError::Cancelled));
        }

        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => return this.finish(outcome),
            // The registration was dropped: either it expired before a
            // dispatch could claim it, or the delegate itself is gone.
            Poll::Ready(Err(_)) => {
                return match this.elapsed() {
                    Some(timeout) => this.time_out(timeout),
                    None => this.finish(Err(WaitError::Cancelled)),
                };
            }
            Poll::Pending => {}
        }

        let (Some(timeout), Some(deadline)) = (this.timeout, this.deadline) else {
            return Poll::Pending;
        };
        let sleep = this
            .sleep
            .get_or_insert_with(|| Box::pin(tokio::time::sleep_until(deadline)));
        if sleep.as_mut().poll(cx).is_pending() {
            return Poll::Pending;
        }

        // Close first so a dispatch racing with the deadline cannot deliver
        // after we report the timeout; anything it already sent still wins.
        this.receiver.close();
        if let Ok(outcome) = this.receiver.try_recv() {
            return this.finish(outcome);
        }
        this.time_out(timeout)
    }
}

impl<T: Message> Drop for WaitFor<T> {
    fn drop(&mut self) {
        if !self.finished {
            self.receiver.close();
            self.deregister();
        }
    }
}

impl<T: Message> fmt::Debug for WaitFor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitFor")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("timeout", &self.timeout)
            .field("finished", &self.finished)
            .finish()
    }
}
