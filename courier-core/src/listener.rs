//! # Persistent Listeners
//!
//! A listener is an asynchronous callback registered under an event name. It
//! is invoked with the event's positional arguments on every matching
//! dispatch until it is explicitly unregistered.
//!
//! Listeners must be *deferred* computations: calling one produces a future,
//! it does not do the work inline. A plain synchronous function is rejected
//! when it is registered (see the diagnostic on [`Listener`]).
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|args: EventArgs<T>| async move { ... }`
//! 2. **Struct implementation**: `impl Listener<MyPayload> for MyListener`
//!
//! Either form is wrapped in a [`ListenerRef`] before registration. The
//! reference is what identifies the listener when it is removed again, so the
//! same callback can be registered under several names and removed from one
//! of them without touching the others.

use crate::{args::EventArgs, error::BoxError, message::Message};
use std::{fmt, future::Future, pin::Pin, sync::Arc};

/// An asynchronous callback for a named event.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an async listener for `{T}` payloads",
    label = "listeners must be async: this callable does not return a future",
    note = "Register an `async` closure (`|args| async move {{ .. }}`) or a type implementing `Listener<{T}>`; plain synchronous functions are rejected."
)]
pub trait Listener<T: Message>: Send + Sync + 'static {
    /// Handle one dispatch of the event.
    fn call(&self, args: EventArgs<T>) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Conversion from a listener's return value into its outcome.
///
/// - `()` → success
/// - `Result<(), E>` → success or the boxed error
pub trait IntoListenerResult: Send + 'static {
    /// Convert into the listener outcome.
    fn into_listener_result(self) -> Result<(), BoxError>;
}

impl IntoListenerResult for () {
    fn into_listener_result(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E> IntoListenerResult for Result<(), E>
where
    E: Into<BoxError> + Send + 'static,
{
    fn into_listener_result(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}

// Blanket impl for async closures
impl<F, T, Fut, R> Listener<T> for F
where
    T: Message,
    F: Fn(EventArgs<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send,
    R: IntoListenerResult,
{
    fn call(&self, args: EventArgs<T>) -> impl Future<Output = Result<(), BoxError>> + Send {
        let fut = (self)(args);
        async move { fut.await.into_listener_result() }
    }
}

/// Dynamic object-safe version of [`Listener`].
pub trait DynListener<T: Message>: Send + Sync + 'static {
    /// Handle one dispatch of the event (dynamic dispatch version).
    fn call_dyn<'a>(
        &'a self,
        args: EventArgs<T>,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;
}

impl<T: Message, L: Listener<T>> DynListener<T> for L {
    fn call_dyn<'a>(
        &'a self,
        args: EventArgs<T>,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>> {
        Box::pin(self.call(args))
    }
}

/// A shared handle to a registered listener.
///
/// Two references are equal when they point at the same listener allocation,
/// which is how `unregister` recognises "the same callback".
pub struct ListenerRef<T: Message> {
    inner: Arc<dyn DynListener<T>>,
}

impl<T: Message> ListenerRef<T> {
    /// Wrap a listener for registration.
    pub fn new<L: Listener<T>>(listener: L) -> Self {
        Self {
            inner: Arc::new(listener),
        }
    }

    /// Invoke the listener.
    pub fn call(
        &self,
        args: EventArgs<T>,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + '_>> {
        self.inner.call_dyn(args)
    }

    /// Invoke the listener through an owned handle, so the returned future can
    /// outlive `self`.
    pub fn call_owned(
        &self,
        args: EventArgs<T>,
    ) -> impl Future<Output = Result<(), BoxError>> + Send + 'static + use<T> {
        let inner = Arc::clone(&self.inner);
        async move { inner.call_dyn(args).await }
    }
}

impl<T: Message> Clone for ListenerRef<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Message> PartialEq for ListenerRef<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Message> Eq for ListenerRef<T> {}

impl<T: Message> fmt::Debug for ListenerRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ListenerRef")
            .field(&Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}
