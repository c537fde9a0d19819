//! Eagerly scheduled tasks that may or may not be awaited.
//!
//! [`schedule`] starts a future on the Tokio runtime right away and hands back
//! a [`Scheduled`] handle. The work runs whether or not the handle is ever
//! awaited. What happens when the handle is dropped depends on how it was used:
//!
//! | handle state on drop          | unshielded | shielded |
//! |-------------------------------|------------|----------|
//! | never polled                  | detached   | detached |
//! | polled, task still running    | aborted    | detached |
//! | task already finished         | no-op      | no-op    |
//!
//! A polled-then-dropped handle means whoever was awaiting it was cancelled,
//! so an unshielded task is cancelled along with it.

use courier_core::{TaskError, panic_message};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::task::{JoinError, JoinHandle};

/// Handle to a task started by [`schedule`] or [`schedule_shielded`].
#[must_use = "dropping an unpolled handle detaches the task; await it to observe its result"]
pub struct Scheduled<T> {
    handle: JoinHandle<T>,
    shielded: bool,
    polled: bool,
    finished: bool,
}

/// Start `future` on the current Tokio runtime.
///
/// `description` is recorded on the task's span when the `tracing` feature is
/// enabled.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn schedule<F>(description: Option<&'static str>, future: F) -> Scheduled<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    spawn(description, future, false)
}

/// Start `future` on the current Tokio runtime, protected from cancellation
/// of whoever awaits the returned handle.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn schedule_shielded<F>(description: Option<&'static str>, future: F) -> Scheduled<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    spawn(description, future, true)
}

fn spawn<F>(description: Option<&'static str>, future: F, shielded: bool) -> Scheduled<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    #[cfg(feature = "tracing")]
    let handle = {
        use tracing::Instrument;
        let span = tracing::debug_span!("courier.task", task = description.unwrap_or("anonymous"), shielded);
        tokio::spawn(future.instrument(span))
    };
    #[cfg(not(feature = "tracing"))]
    let handle = {
        let _ = description;
        tokio::spawn(future)
    };

    Scheduled {
        handle,
        shielded,
        polled: false,
        finished: false,
    }
}

impl<T> Scheduled<T> {
    /// Returns `true` if the task was scheduled shielded.
    pub fn is_shielded(&self) -> bool {
        self.shielded
    }

    /// Returns `true` once the task has run to completion (or was aborted).
    pub fn is_finished(&self) -> bool {
        self.finished || self.handle.is_finished()
    }

    /// Abort the task, shielded or not.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Let the task run to completion without observing its result.
    pub fn detach(mut self) {
        self.shielded = true;
    }
}

fn task_error(err: JoinError) -> TaskError {
    if err.is_panic() {
        TaskError::Panicked(panic_message(&*err.into_panic()))
    } else {
        TaskError::Cancelled
    }
}

impl<T> Future for Scheduled<T> {
    type Output = Result<T, TaskError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        this.polled = true;
        match Pin::new(&mut this.handle).poll(cx) {
            Poll::Ready(result) => {
                this.finished = true;
                Poll::Ready(result.map_err(task_error))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Drop for Scheduled<T> {
    fn drop(&mut self) {
        if self.polled && !self.finished && !self.shielded {
            self.handle.abort();
        }
    }
}
