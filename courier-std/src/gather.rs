//! Aggregate completion of every listener invoked by one dispatch.

use crate::{task::schedule, timeout::maybe_timeout};
use courier_core::{BoxError, ListenerError, panic_message};
use futures::future::{BoxFuture, FutureExt, join_all};
use std::{
    fmt,
    future::Future,
    panic::AssertUnwindSafe,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

/// The in-flight listener invocations of one dispatch.
///
/// All listeners of a dispatch are driven by one task on the runtime, which
/// starts them in registration order and then runs them concurrently.
/// Awaiting this only waits for them. Each listener's outcome is collected
/// independently: one failing, panicking or timed-out listener does not
/// cancel its siblings.
///
/// Dropping a `Dispatched` that was never polled leaves the listeners
/// running. Dropping one that was being awaited cancels the listeners that
/// have not finished yet.
#[must_use = "listeners run regardless; await this to observe their outcomes"]
pub struct Dispatched {
    inner: BoxFuture<'static, GatherReport>,
    listeners: usize,
}

impl Dispatched {
    /// A dispatch that invoked no listeners; resolves immediately to an empty
    /// report.
    pub fn completed() -> Self {
        Self {
            inner: crate::future::completed(GatherReport::default()).boxed(),
            listeners: 0,
        }
    }

    /// Start `calls` on the current runtime, each bounded by `timeout`.
    ///
    /// Outside a Tokio runtime nothing is started and every listener is
    /// reported as [`ListenerError::Cancelled`].
    pub(crate) fn fan_out<I, F>(calls: I, timeout: Option<Duration>) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        let calls: Vec<_> = calls
            .into_iter()
            .map(|call| guarded(call, timeout))
            .collect();
        let listeners = calls.len();
        if listeners == 0 {
            return Self::completed();
        }
        if tokio::runtime::Handle::try_current().is_err() {
            #[cfg(feature = "tracing")]
            tracing::warn!(listeners, "dispatch outside a Tokio runtime; listeners were not started");
            return Self::cancelled(listeners);
        }

        let inner = schedule(Some("dispatch"), join_all(calls))
            .map(move |joined| GatherReport {
                outcomes: match joined {
                    Ok(outcomes) => outcomes,
                    Err(err) => (0..listeners)
                        .map(|_| Err(ListenerError::from(err.clone())))
                        .collect(),
                },
            })
            .boxed();
        Self { inner, listeners }
    }

    fn cancelled(listeners: usize) -> Self {
        let report = GatherReport {
            outcomes: (0..listeners).map(|_| Err(ListenerError::Cancelled)).collect(),
        };
        Self {
            inner: crate::future::completed(report).boxed(),
            listeners,
        }
    }

    /// Number of listeners this dispatch invoked.
    pub fn listener_count(&self) -> usize {
        self.listeners
    }
}

impl Future for Dispatched {
    type Output = GatherReport;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl fmt::Debug for Dispatched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatched")
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

/// The outcome of every listener of one dispatch, in registration order.
#[derive(Debug, Default)]
pub struct GatherReport {
    outcomes: Vec<Result<(), ListenerError>>,
}

impl GatherReport {
    /// Per-listener outcomes, in the order the listeners were invoked.
    pub fn outcomes(&self) -> &[Result<(), ListenerError>] {
        &self.outcomes
    }

    /// Consume the report, returning the per-listener outcomes.
    pub fn into_outcomes(self) -> Vec<Result<(), ListenerError>> {
        self.outcomes
    }

    /// Number of listeners that were invoked.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns `true` if no listener was invoked.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Returns `true` if every listener succeeded.
    pub fn is_ok(&self) -> bool {
        self.outcomes.iter().all(Result::is_ok)
    }

    /// Iterate over the failed listeners' errors.
    pub fn failures(&self) -> impl Iterator<Item = &ListenerError> {
        self.outcomes.iter().filter_map(|outcome| outcome.as_ref().err())
    }

    /// Collapse into the first failure, if any.
    pub fn into_result(self) -> Result<(), ListenerError> {
        self.outcomes.into_iter().collect()
    }
}

/// One listener invocation with its panic and deadline captured as outcomes.
async fn guarded<F>(call: F, timeout: Option<Duration>) -> Result<(), ListenerError>
where
    F: Future<Output = Result<(), BoxError>>,
{
    match maybe_timeout(timeout, AssertUnwindSafe(call).catch_unwind()).await {
        Ok(Ok(outcome)) => outcome.map_err(ListenerError::Failed),
        Ok(Err(panic)) => Err(ListenerError::Panicked(panic_message(&*panic))),
        Err(elapsed) => Err(elapsed.into()),
    }
}
