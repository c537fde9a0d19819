//! Builder for configuring an [`EventDelegate`].

use super::EventDelegate;
use courier_core::Message;
use std::{marker::PhantomData, time::Duration};

/// Settings shared by a delegate and all of its clones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateConfig {
    /// Name recorded on log events emitted by this delegate.
    pub label: &'static str,
    /// Deadline applied to every listener invocation. `None` or zero means
    /// listeners may run indefinitely.
    pub listener_timeout: Option<Duration>,
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            label: "delegate",
            listener_timeout: None,
        }
    }
}

/// Builder for constructing an [`EventDelegate`].
///
/// # Example
/// ```ignore
/// let delegate = EventDelegate::<GatewayObject>::builder()
///     .label("gateway")
///     .listener_timeout(Some(Duration::from_secs(30)))
///     .build();
/// ```
pub struct EventDelegateBuilder<T: Message> {
    config: DelegateConfig,
    _payload: PhantomData<fn() -> T>,
}

impl<T: Message> EventDelegateBuilder<T> {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: DelegateConfig::default(),
            _payload: PhantomData,
        }
    }

    /// Set the label recorded on log events.
    pub fn label(mut self, label: &'static str) -> Self {
        self.config.label = label;
        self
    }

    /// Bound every listener invocation by `timeout`.
    pub fn listener_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.listener_timeout = timeout;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: DelegateConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the delegate.
    pub fn build(self) -> EventDelegate<T> {
        EventDelegate::with_config(self.config)
    }
}

impl<T: Message> Default for EventDelegateBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
