//! # courier - Named-Event Dispatch for Gateway Clients
//!
//! `courier` routes events decoded by a connection layer to the application
//! code interested in them. Two kinds of interest are supported:
//!
//! - **Listeners**: persistent async callbacks, run on every dispatch of the
//!   event name they are registered under.
//! - **Waiters**: one-shot futures that resolve on the first dispatch whose
//!   arguments satisfy a predicate, with an optional timeout.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier::prelude::*;
//! use std::time::Duration;
//!
//! let delegate = EventDelegate::<Gateway>::new();
//!
//! // Persistent listener
//! let greet = delegate.listen("member_join", |args: EventArgs<Gateway>| async move {
//!     println!("welcome {:?}", args.first());
//! })?;
//!
//! // One-shot waiter
//! let confirmation = delegate.wait_for(
//!     "reaction",
//!     Some(Duration::from_secs(60)),
//!     |args: &EventArgs<Gateway>| args.len() == 2,
//! );
//!
//! // From the connection layer
//! delegate.dispatch("reaction", [user, emoji]);
//!
//! match confirmation.await {
//!     Ok(Payload::Many(args)) => { /* (user, emoji) */ }
//!     Err(WaitError::Timeout(_)) => { /* nobody reacted */ }
//!     _ => {}
//! }
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use courier_core::{
    // Predicates
    Always,
    // Errors
    BoxError,
    CourierError,
    DelegateError,
    // Listeners
    DynListener,
    // Payloads
    EventArgs,
    IntoListenerResult,
    IntoMatch,
    Listener,
    ListenerError,
    ListenerRef,
    Message,
    Payload,
    Predicate,
    TaskError,
    TimeoutError,
    WaitError,
};

// Delegate
pub use courier_std::delegate::{DelegateConfig, EventDelegate, EventDelegateBuilder, WaitFor};

// Gathering and scheduling
pub use courier_std::{
    future::{Completed, completed},
    gather::{Dispatched, GatherReport},
    task::{Scheduled, schedule, schedule_shielded},
    timeout::{maybe_timeout, timeout_from_secs},
};

/// Standard listener adapters.
pub mod listeners {
    pub use courier_std::listeners::{LoggingListener, TimeoutListener};
}

/// Testing utilities.
pub mod testing {
    pub use courier_std::testing::{
        CountingPredicate, FailingListener, OrderLog, PanickingListener, RecordingListener,
    };
}

/// Prelude module - common imports for courier.
///
/// # Usage
///
/// ```rust,ignore
/// use courier::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, Dispatched, EventArgs, EventDelegate, GatherReport, Listener, ListenerError,
        ListenerRef, Message, Payload, Predicate, WaitError, WaitFor, maybe_timeout,
    };
}
