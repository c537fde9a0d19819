//! Logging listener for event observation.

use courier_core::{BoxError, EventArgs, Listener, Message};

/// A listener that logs every dispatch it receives.
///
/// Register it under any name to trace that event's traffic. Without the
/// `tracing` feature it does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingListener {
    event: &'static str,
}

impl LoggingListener {
    /// Create a logging listener that tags its records with `event`.
    pub fn new(event: &'static str) -> Self {
        Self { event }
    }
}

impl<T: Message + std::fmt::Debug> Listener<T> for LoggingListener {
    async fn call(&self, args: EventArgs<T>) -> Result<(), BoxError> {
        #[cfg(feature = "tracing")]
        tracing::info!(event = self.event, arity = args.len(), ?args, "event received");
        #[cfg(not(feature = "tracing"))]
        let _ = (self.event, args);
        Ok(())
    }
}
