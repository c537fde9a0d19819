//! Error types for courier.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`CourierError`] - Top-level error type for all courier operations
//! - [`DelegateError`] - Misuse of the delegate's registration API
//! - [`WaitError`] - Why a one-shot waiter did not receive a payload
//! - [`ListenerError`] - The failure outcome of a single listener invocation
//! - [`TaskError`] - A scheduled task panicked or was aborted
//! - [`TimeoutError`] - A scoped deadline elapsed

use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all courier operations.
#[derive(Error, Debug)]
pub enum CourierError {
    /// The delegate's registration API was misused.
    #[error("delegate error: {0}")]
    Delegate(#[from] DelegateError),

    /// A one-shot waiter did not receive a payload.
    #[error("wait error: {0}")]
    Wait(#[from] WaitError),

    /// A listener failed.
    #[error("listener error: {0}")]
    Listener(#[from] ListenerError),

    /// A scheduled task panicked or was aborted.
    #[error("task error: {0}")]
    Task(#[from] TaskError),

    /// A scoped deadline elapsed.
    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors raised synchronously by the delegate's registration API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DelegateError {
    /// A listener was registered under an empty event name.
    #[error("event name must not be empty")]
    EmptyEventName,
}

/// Why a `wait_for` call ended without a matching payload.
#[derive(Error, Debug)]
pub enum WaitError {
    /// No matching event arrived before the deadline.
    #[error("no matching event within {0:?}")]
    Timeout(Duration),

    /// The waiter's predicate returned an error.
    #[error("predicate failed")]
    Predicate(#[source] BoxError),

    /// The waiter's predicate panicked.
    #[error("predicate panicked: {0}")]
    PredicatePanicked(String),

    /// The waiter was cancelled, or its delegate was dropped.
    #[error("waiter was cancelled")]
    Cancelled,
}

impl WaitError {
    /// Returns `true` if the waiter gave up because its deadline elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::Timeout(_))
    }

    /// Returns `true` if the waiter was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WaitError::Cancelled)
    }
}

/// The failure outcome of one listener within a dispatch.
#[derive(Error, Debug)]
pub enum ListenerError {
    /// The listener returned an error.
    #[error("listener failed")]
    Failed(#[source] BoxError),

    /// The listener panicked.
    #[error("listener panicked: {0}")]
    Panicked(String),

    /// The listener's task was cancelled before it finished.
    #[error("listener was cancelled")]
    Cancelled,

    /// The listener exceeded its deadline.
    #[error("listener timed out after {0:?}")]
    TimedOut(Duration),
}

/// Why a scheduled task produced no value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The task panicked.
    #[error("task panicked: {0}")]
    Panicked(String),

    /// The task was aborted before it finished.
    #[error("task was cancelled")]
    Cancelled,
}

/// Error returned when a scoped deadline elapses.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("operation timed out after {duration:?}")]
pub struct TimeoutError {
    duration: Duration,
}

impl TimeoutError {
    /// Create a new timeout error.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Get the duration that was exceeded.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

// Convenience conversions
impl From<BoxError> for CourierError {
    fn from(err: BoxError) -> Self {
        CourierError::Custom(err)
    }
}

impl From<BoxError> for ListenerError {
    fn from(err: BoxError) -> Self {
        ListenerError::Failed(err)
    }
}

impl From<TaskError> for ListenerError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Panicked(message) => ListenerError::Panicked(message),
            TaskError::Cancelled => ListenerError::Cancelled,
        }
    }
}

impl From<TimeoutError> for WaitError {
    fn from(err: TimeoutError) -> Self {
        WaitError::Timeout(err.duration())
    }
}

impl From<TimeoutError> for ListenerError {
    fn from(err: TimeoutError) -> Self {
        ListenerError::TimedOut(err.duration())
    }
}

/// Render a panic payload captured by `catch_unwind` or a join error.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
