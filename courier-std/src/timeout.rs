//! Optional deadlines around a scoped operation.

use courier_core::TimeoutError;
use std::{future::Future, time::Duration};

/// Run `operation`, bounded by `timeout` when one is given.
///
/// - `Some(d)` with a non-zero `d`: the operation is cancelled (dropped) once
///   `d` elapses and `Err(TimeoutError)` is returned.
/// - `None` or `Some(Duration::ZERO)`: the operation runs with no deadline
///   and this never returns an error.
///
/// The deadline lives inside the returned future, so it is disarmed on every
/// exit path: completion, timeout, or the caller dropping the future.
///
/// ```rust,ignore
/// let reply = maybe_timeout(Some(Duration::from_secs(30)), fetch_reply()).await?;
/// ```
pub async fn maybe_timeout<F>(timeout: Option<Duration>, operation: F) -> Result<F::Output, TimeoutError>
where
    F: Future,
{
    match timeout.filter(|d| !d.is_zero()) {
        Some(duration) => tokio::time::timeout(duration, operation)
            .await
            .map_err(|_| TimeoutError::new(duration)),
        None => Ok(operation.await),
    }
}

/// Convert a timeout given in (possibly fractional, possibly non-positive)
/// seconds into the form [`maybe_timeout`] takes.
///
/// Non-positive and non-finite values mean "no deadline".
pub fn timeout_from_secs(seconds: f64) -> Option<Duration> {
    if seconds.is_finite() && seconds > 0.0 {
        Some(Duration::from_secs_f64(seconds))
    } else {
        None
    }
}
