//! # courier-core
//!
//! Core traits and types for the courier event delegate.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! code that produces or consumes events (a gateway decoder, an application's
//! handler modules) without pulling in the runtime-backed implementation in
//! `courier-std`.
//!
//! # Building Blocks
//!
//! ## Payloads ([`Message`], [`EventArgs`], [`Payload`])
//!
//! A dispatch carries zero or more positional arguments of one payload type.
//! Listeners and predicates see them as [`EventArgs`]; a one-shot waiter
//! receives them folded into a [`Payload`]:
//!
//! - no arguments → [`Payload::Unit`]
//! - one argument → [`Payload::Single`]
//! - two or more → [`Payload::Many`]
//!
//! ## Listeners ([`Listener`], [`ListenerRef`])
//!
//! Persistent asynchronous callbacks, invoked on every dispatch of the name
//! they are registered under. A [`ListenerRef`] is the identity used to
//! remove one again.
//!
//! ## Predicates ([`Predicate`])
//!
//! Synchronous filters deciding whether a dispatch resolves a waiter.
//!
//! # Error Types
//!
//! - [`CourierError`] - Top-level error type
//! - [`DelegateError`] - Registration misuse
//! - [`WaitError`] - Timeout, predicate failure, or cancellation of a waiter
//! - [`ListenerError`] - A single listener's failure outcome
//! - [`TaskError`] - A scheduled task panicked or was aborted
//! - [`TimeoutError`] - A scoped deadline elapsed

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod args;
mod error;
mod listener;
mod message;
mod predicate;

// Re-exports
pub use args::{EventArgs, Payload};
pub use error::{
    BoxError, CourierError, DelegateError, ListenerError, TaskError, TimeoutError, WaitError,
    panic_message,
};
pub use listener::{DynListener, IntoListenerResult, Listener, ListenerRef};
pub use message::Message;
pub use predicate::{Always, IntoMatch, Predicate};
