//! Message trait for event payload types.

/// A marker trait for the values carried by a dispatched event.
///
/// Every argument of a dispatch is a `Message`. Payloads are cloned when a
/// waiter's result is canonicalized, and shared across tasks when listeners
/// run, so they must be `Clone + Send + Sync + 'static`.
///
/// # Example
///
/// ```rust
/// use courier_core::Message;
///
/// #[derive(Clone, Debug)]
/// enum GatewayObject {
///     User(String),
///     Emoji(char),
/// }
///
/// fn assert_message<T: Message>() {}
/// assert_message::<GatewayObject>();
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Clone + Send + Sync + 'static`",
    note = "Event payloads are shared between listeners and waiters, so they must be cloneable and thread-safe."
)]
pub trait Message: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Message for T {}
