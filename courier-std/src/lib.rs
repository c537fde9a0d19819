//! # courier-std
//!
//! Standard implementations for the courier event delegate.
//!
//! This crate provides:
//! - **Event delegate**: [`EventDelegate`], [`EventDelegateBuilder`], [`WaitFor`]
//! - **Gathering**: [`Dispatched`], [`GatherReport`]
//! - **Scheduling**: [`schedule`], [`schedule_shielded`], [`Scheduled`]
//! - **Time**: [`maybe_timeout`], [`completed`]
//! - **Standard listeners**: Logging, Timeout
//! - **Testing doubles**: [`testing`]
//!
//! Everything that spawns or sleeps runs on Tokio.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use courier_core;

// Modules
pub mod delegate;
pub mod future;
pub mod gather;
pub mod listeners;
pub mod task;
pub mod testing;
pub mod timeout;

pub use delegate::{DelegateConfig, EventDelegate, EventDelegateBuilder, WaitFor};
pub use future::{Completed, completed};
pub use gather::{Dispatched, GatherReport};
pub use task::{Scheduled, schedule, schedule_shielded};
pub use timeout::{maybe_timeout, timeout_from_secs};
