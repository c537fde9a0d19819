//! Testing utilities for courier.
//!
//! This module provides doubles that make it easy to assert on what a
//! delegate delivered and in which order.
//!
//! # Features
//!
//! - [`RecordingListener`]: A listener that records every dispatch it receives
//! - [`FailingListener`]: A listener that always returns an error
//! - [`PanickingListener`]: A listener that always panics
//! - [`CountingPredicate`]: A predicate with a fixed answer that counts its calls

use courier_core::{BoxError, EventArgs, Listener, Message, Predicate};
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Listener
// ============================================================================

/// A listener that records every dispatch it receives.
///
/// Clones share their record, so keep one clone for assertions and register
/// the other. Several recorders can share an order log to check invocation
/// order across listeners.
///
/// # Example
///
/// ```rust,ignore
/// let order = OrderLog::default();
/// let first = RecordingListener::<Msg>::with_order(1, order.clone());
/// let second = RecordingListener::<Msg>::with_order(2, order.clone());
///
/// delegate.register("message", ListenerRef::new(first.clone()))?;
/// delegate.register("message", ListenerRef::new(second.clone()))?;
/// delegate.dispatch("message", [msg]).await;
///
/// assert_eq!(order.snapshot(), vec![1, 2]);
/// ```
pub struct RecordingListener<T> {
    calls: Arc<Mutex<Vec<EventArgs<T>>>>,
    order: Option<(usize, OrderLog)>,
}

impl<T> RecordingListener<T> {
    /// Create a new recording listener.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            order: None,
        }
    }

    /// Create a recording listener that also appends `tag` to `order` each
    /// time it runs.
    pub fn with_order(tag: usize, order: OrderLog) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            order: Some((tag, order)),
        }
    }

    /// Get a clone of the recorded dispatches.
    pub fn calls(&self) -> Vec<EventArgs<T>> {
        self.calls.lock().clone()
    }

    /// Get the number of recorded dispatches.
    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Clear all recorded dispatches.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl<T> Default for RecordingListener<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RecordingListener<T> {
    fn clone(&self) -> Self {
        Self {
            calls: self.calls.clone(),
            order: self.order.clone(),
        }
    }
}

impl<T: Message> Listener<T> for RecordingListener<T> {
    async fn call(&self, args: EventArgs<T>) -> Result<(), BoxError> {
        if let Some((tag, order)) = &self.order {
            order.push(*tag);
        }
        self.calls.lock().push(args);
        Ok(())
    }
}

/// A shared log of invocation tags.
#[derive(Debug, Clone, Default)]
pub struct OrderLog(Arc<Mutex<Vec<usize>>>);

impl OrderLog {
    /// Append a tag.
    pub fn push(&self, tag: usize) {
        self.0.lock().push(tag);
    }

    /// Get a clone of the tags recorded so far.
    pub fn snapshot(&self) -> Vec<usize> {
        self.0.lock().clone()
    }
}

// ============================================================================
// Failing Listeners
// ============================================================================

/// A listener that always fails with the given message.
#[derive(Debug, Clone, Copy)]
pub struct FailingListener {
    message: &'static str,
}

impl FailingListener {
    /// Create a failing listener.
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

impl<T: Message> Listener<T> for FailingListener {
    async fn call(&self, _args: EventArgs<T>) -> Result<(), BoxError> {
        Err(self.message.into())
    }
}

/// A listener that always panics with the given message.
#[derive(Debug, Clone, Copy)]
pub struct PanickingListener {
    message: &'static str,
}

impl PanickingListener {
    /// Create a panicking listener.
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

impl<T: Message> Listener<T> for PanickingListener {
    async fn call(&self, _args: EventArgs<T>) -> Result<(), BoxError> {
        panic!("{}", self.message)
    }
}

// ============================================================================
// Counting Predicate
// ============================================================================

/// A predicate with a fixed answer that counts how often it was asked.
#[derive(Debug, Clone)]
pub struct CountingPredicate {
    calls: Arc<AtomicUsize>,
    answer: bool,
}

impl CountingPredicate {
    /// A predicate that always answers `answer`.
    pub fn new(answer: bool) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            answer,
        }
    }

    /// How many times the predicate ran.
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<T: Message> Predicate<T> for CountingPredicate {
    fn test(&self, _args: &EventArgs<T>) -> Result<bool, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}
