//! Named-event dispatch to persistent listeners and one-shot waiters.
//!
//! An [`EventDelegate`] sits between a connection layer that decodes remote
//! events and the application code reacting to them:
//!
//! - **Listeners** are registered with [`EventDelegate::register`] and run on
//!   every dispatch of their event name until [`EventDelegate::unregister`]
//!   removes them.
//! - **Waiters** are created by [`EventDelegate::wait_for`]. Each is resolved
//!   by at most one future dispatch whose arguments satisfy its predicate,
//!   fails on its timeout, or disappears when its handle is dropped.
//!
//! # Re-entrancy
//!
//! Predicates and listeners may call back into the delegate (register,
//! unregister, dispatch, wait_for). The internal lock is never held while user
//! code runs: dispatch works from snapshots and detaches each waiter under
//! the lock before completing it.

mod builder;
mod state;
mod waiter;

pub use builder::{DelegateConfig, EventDelegateBuilder};
pub use waiter::WaitFor;

use crate::gather::Dispatched;
use courier_core::{
    Always, DelegateError, EventArgs, Listener, ListenerRef, Message, Predicate, WaitError,
    panic_message,
};
use state::Shared;
use std::{
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
    time::Duration,
};
use tokio::{sync::oneshot, time::Instant};

/// Stores listeners and one-shot waiters by event name and dispatches events
/// to them.
///
/// Cloning is cheap and every clone shares the same registrations, so a
/// listener can hold a clone of the delegate that invokes it.
///
/// # Example
///
/// ```rust,ignore
/// let delegate = EventDelegate::<GatewayObject>::new();
///
/// let on_message = ListenerRef::new(|args: EventArgs<GatewayObject>| async move {
///     println!("{:?}", args.first());
/// });
/// delegate.register("message", on_message.clone())?;
///
/// let reply = delegate.wait_for("message", Some(Duration::from_secs(30)), |args: &EventArgs<_>| {
///     matches!(args.first(), Some(GatewayObject::Message(m)) if m.author == "alice")
/// });
///
/// delegate.dispatch("message", [decoded]);
/// let Payload::Single(message) = reply.await? else { unreachable!() };
/// ```
pub struct EventDelegate<T: Message> {
    shared: Arc<Shared<T>>,
}

impl<T: Message> EventDelegate<T> {
    /// Create a delegate with default settings.
    pub fn new() -> Self {
        Self::with_config(DelegateConfig::default())
    }

    /// Start configuring a delegate.
    pub fn builder() -> EventDelegateBuilder<T> {
        EventDelegateBuilder::new()
    }

    /// Create a delegate with the given settings.
    pub fn with_config(config: DelegateConfig) -> Self {
        Self {
            shared: Arc::new(Shared::new(config)),
        }
    }

    /// The settings this delegate was built with.
    pub fn config(&self) -> &DelegateConfig {
        &self.shared.config
    }

    /// Register `listener` to run on every dispatch of `name`.
    ///
    /// Listeners for one name are invoked in registration order. Registering
    /// the same listener twice makes it run twice per dispatch.
    pub fn register(
        &self,
        name: impl Into<String>,
        listener: ListenerRef<T>,
    ) -> Result<(), DelegateError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DelegateError::EmptyEventName);
        }
        let count = self.shared.state.lock().add_listener(name.clone(), listener);
        #[cfg(feature = "tracing")]
        tracing::debug!(delegate = self.shared.config.label, event = %name, listeners = count, "listener registered");
        #[cfg(not(feature = "tracing"))]
        let _ = (name, count);
        Ok(())
    }

    /// Wrap `listener`, register it under `name`, and return the reference
    /// needed to unregister it later.
    pub fn listen<L: Listener<T>>(
        &self,
        name: impl Into<String>,
        listener: L,
    ) -> Result<ListenerRef<T>, DelegateError> {
        let listener = ListenerRef::new(listener);
        self.register(name, listener.clone())?;
        Ok(listener)
    }

    /// Remove one registration of `listener` from `name`.
    ///
    /// Other names the listener is registered under are untouched. Returns
    /// `false`, and changes nothing, if it was not registered under `name`.
    pub fn unregister(&self, name: &str, listener: &ListenerRef<T>) -> bool {
        let removed = self.shared.state.lock().remove_listener(name, listener);
        #[cfg(feature = "tracing")]
        tracing::debug!(delegate = self.shared.config.label, event = name, removed, "listener unregistered");
        removed
    }

    /// Dispatch `name` with positional `args`.
    ///
    /// Pending waiters are resolved first, synchronously: each one whose
    /// predicate matches is completed with the canonicalized arguments and
    /// removed, each one whose predicate fails is completed with that failure
    /// and removed, the rest stay pending. Then every listener registered for
    /// `name` is started on the runtime, in registration order.
    ///
    /// Returns immediately. The returned [`Dispatched`] can be awaited for the
    /// listeners' outcomes or ignored; if no listener is registered it is
    /// already complete. Called outside a Tokio runtime, waiters are still
    /// resolved but listeners are not started and are reported as
    /// [`ListenerError::Cancelled`](courier_core::ListenerError::Cancelled).
    pub fn dispatch(&self, name: &str, args: impl Into<EventArgs<T>>) -> Dispatched {
        let args = args.into();
        self.resolve_waiters(name, &args);

        let listeners = self.shared.state.lock().listeners_for(name);
        #[cfg(feature = "tracing")]
        tracing::trace!(
            delegate = self.shared.config.label,
            event = name,
            args = args.len(),
            listeners = listeners.len(),
            "dispatching event"
        );
        Dispatched::fan_out(
            listeners.iter().map(|listener| listener.call_owned(args.clone())),
            self.shared.config.listener_timeout,
        )
    }

    fn resolve_waiters(&self, name: &str, args: &EventArgs<T>) {
        let pending = self.shared.state.lock().pending_waiters(name);
        if pending.is_empty() {
            return;
        }

        let payload = args.canonicalize();
        for (id, predicate) in pending {
            let outcome = match catch_unwind(AssertUnwindSafe(|| predicate.test(args))) {
                Ok(Ok(true)) => Ok(payload.clone()),
                Ok(Ok(false)) => continue,
                Ok(Err(err)) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(delegate = self.shared.config.label, event = name, waiter = ?id, error = %err, "waiter predicate failed");
                    Err(WaitError::Predicate(err))
                }
                Err(panic) => {
                    let message = panic_message(&*panic);
                    #[cfg(feature = "tracing")]
                    tracing::warn!(delegate = self.shared.config.label, event = name, waiter = ?id, panic = %message, "waiter predicate panicked");
                    Err(WaitError::PredicatePanicked(message))
                }
            };

            // A waiter can vanish while its predicate runs: timed out,
            // dropped, or resolved by a re-entrant dispatch.
            let Some(sender) = self.shared.state.lock().take_waiter(name, id) else {
                continue;
            };
            let delivered = sender.send(outcome).is_ok();
            #[cfg(feature = "tracing")]
            tracing::debug!(delegate = self.shared.config.label, event = name, waiter = ?id, delivered, "waiter resolved");
            #[cfg(not(feature = "tracing"))]
            let _ = delivered;
        }
    }

    /// Wait for the next dispatch of `name` whose arguments satisfy
    /// `predicate`.
    ///
    /// The waiter is registered immediately, so a dispatch that happens
    /// before the returned future is first polled still counts. With
    /// `timeout` set, the clock starts now: once it elapses, dispatches no
    /// longer see the waiter and the future fails with
    /// [`WaitError::Timeout`]. With `None` it waits for as long as the
    /// handle is alive.
    ///
    /// A waiter without a timeout stays registered until it matches or its
    /// handle is dropped. Prefer a listener for events you want to see
    /// repeatedly.
    pub fn wait_for<P: Predicate<T>>(
        &self,
        name: impl Into<String>,
        timeout: Option<Duration>,
        predicate: P,
    ) -> WaitFor<T> {
        let name = name.into();
        let deadline = timeout.map(|duration| Instant::now() + duration);
        let (sender, receiver) = oneshot::channel();
        let id = self.shared.state.lock().add_waiter(
            name.clone(),
            sender,
            Arc::new(predicate),
            deadline,
        );
        #[cfg(feature = "tracing")]
        tracing::debug!(delegate = self.shared.config.label, event = %name, waiter = ?id, ?timeout, "waiter registered");
        WaitFor::new(
            Arc::downgrade(&self.shared),
            name,
            id,
            receiver,
            timeout,
            deadline,
        )
    }

    /// Wait for the next dispatch of `name`, whatever its arguments.
    pub fn wait_for_next(&self, name: impl Into<String>, timeout: Option<Duration>) -> WaitFor<T> {
        self.wait_for(name, timeout, Always)
    }

    /// Number of listeners registered under `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.shared.state.lock().listener_count(name)
    }

    /// Returns `true` if at least one listener is registered under `name`.
    pub fn has_listeners(&self, name: &str) -> bool {
        self.listener_count(name) > 0
    }

    /// Number of live waiters registered under `name`.
    pub fn waiter_count(&self, name: &str) -> usize {
        self.shared.state.lock().waiter_count(name)
    }

    /// Returns `true` if at least one live waiter is registered under `name`.
    pub fn has_waiters(&self, name: &str) -> bool {
        self.waiter_count(name) > 0
    }

    /// Every name with at least one listener or live waiter, sorted.
    pub fn event_names(&self) -> Vec<String> {
        self.shared.state.lock().event_names()
    }
}

impl<T: Message> Clone for EventDelegate<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Message> Default for EventDelegate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Message> fmt::Debug for EventDelegate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDelegate")
            .field("config", &self.shared.config)
            .field("events", &self.event_names())
            .finish()
    }
}
