//! Waiter predicates.
//!
//! A predicate decides whether a dispatch satisfies a pending one-shot
//! waiter. It runs synchronously inside `dispatch`, sees the same positional
//! arguments listeners see, and may fail: an `Err` is delivered to that
//! waiter alone.

use crate::{args::EventArgs, error::BoxError, message::Message};

/// Conversion from a predicate's return value into a match decision.
///
/// - `bool` → match or no match
/// - `Result<bool, E>` → match, no match, or a failure for the waiter
pub trait IntoMatch {
    /// Convert into the match decision.
    fn into_match(self) -> Result<bool, BoxError>;
}

impl IntoMatch for bool {
    fn into_match(self) -> Result<bool, BoxError> {
        Ok(self)
    }
}

impl<E> IntoMatch for Result<bool, E>
where
    E: Into<BoxError>,
{
    fn into_match(self) -> Result<bool, BoxError> {
        self.map_err(Into::into)
    }
}

/// A synchronous filter over a dispatch's arguments.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a waiter predicate for `{T}` payloads",
    label = "predicates must be synchronous functions of `&EventArgs<{T}>`",
    note = "Predicates return `bool` or `Result<bool, E>`; async predicates are not supported."
)]
pub trait Predicate<T: Message>: Send + Sync + 'static {
    /// Evaluate the predicate against one dispatch.
    fn test(&self, args: &EventArgs<T>) -> Result<bool, BoxError>;
}

impl<F, T, R> Predicate<T> for F
where
    T: Message,
    F: Fn(&EventArgs<T>) -> R + Send + Sync + 'static,
    R: IntoMatch,
{
    fn test(&self, args: &EventArgs<T>) -> Result<bool, BoxError> {
        (self)(args).into_match()
    }
}

/// A predicate that matches every dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl<T: Message> Predicate<T> for Always {
    fn test(&self, _args: &EventArgs<T>) -> Result<bool, BoxError> {
        Ok(true)
    }
}
