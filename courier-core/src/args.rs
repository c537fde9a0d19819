//! Positional event arguments and their canonical result shape.
//!
//! A dispatch carries zero or more positional arguments. Listeners and
//! predicates see them as a slice ([`EventArgs`]); waiters receive them folded
//! into a [`Payload`] whose shape depends on how many arguments there were.

use crate::message::Message;
use std::{fmt, ops::Deref, sync::Arc};

/// The positional arguments of a single dispatch.
///
/// Cheap to clone: every listener and predicate of one dispatch shares the
/// same allocation.
pub struct EventArgs<T> {
    inner: Arc<[T]>,
}

impl<T> EventArgs<T> {
    /// Arguments for an event that carries nothing.
    pub fn empty() -> Self {
        Self {
            inner: Arc::from(Vec::new()),
        }
    }

    /// View the arguments as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.inner
    }
}

impl<T: Message> EventArgs<T> {
    /// Fold the arguments into the shape delivered to a waiter.
    ///
    /// - no arguments: [`Payload::Unit`]
    /// - exactly one: [`Payload::Single`] holding that argument
    /// - two or more: [`Payload::Many`] holding all of them in order
    pub fn canonicalize(&self) -> Payload<T> {
        match &*self.inner {
            [] => Payload::Unit,
            [only] => Payload::Single(only.clone()),
            many => Payload::Many(many.to_vec()),
        }
    }
}

impl<T> Clone for EventArgs<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Deref for EventArgs<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: fmt::Debug> fmt::Debug for EventArgs<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.iter()).finish()
    }
}

impl<T> Default for EventArgs<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Vec<T>> for EventArgs<T> {
    fn from(args: Vec<T>) -> Self {
        Self {
            inner: Arc::from(args),
        }
    }
}

impl<T, const N: usize> From<[T; N]> for EventArgs<T> {
    fn from(args: [T; N]) -> Self {
        Self {
            inner: Arc::from(Vec::from(args)),
        }
    }
}

impl<T> FromIterator<T> for EventArgs<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

/// The canonicalized result a waiter resolves with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Payload<T> {
    /// The event carried no arguments.
    Unit,
    /// The event carried exactly one argument.
    Single(T),
    /// The event carried two or more arguments.
    Many(Vec<T>),
}

impl<T> Payload<T> {
    /// Returns `true` for [`Payload::Unit`].
    pub fn is_unit(&self) -> bool {
        matches!(self, Payload::Unit)
    }

    /// Take the single argument, if there was exactly one.
    pub fn into_single(self) -> Option<T> {
        match self {
            Payload::Single(value) => Some(value),
            _ => None,
        }
    }

    /// Flatten back into the positional argument list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Payload::Unit => Vec::new(),
            Payload::Single(value) => vec![value],
            Payload::Many(values) => values,
        }
    }

    /// Number of arguments the payload was built from.
    pub fn arity(&self) -> usize {
        match self {
            Payload::Unit => 0,
            Payload::Single(_) => 1,
            Payload::Many(values) => values.len(),
        }
    }
}
