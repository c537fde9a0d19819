//! The two registries behind an [`EventDelegate`](super::EventDelegate).
//!
//! Both maps keep one invariant: a name is present only while its entry list
//! is non-empty. Every mutation that can empty a list removes the key.

use super::builder::DelegateConfig;
use courier_core::{ListenerRef, Message, Payload, Predicate, WaitError};
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc};
use tokio::{sync::oneshot, time::Instant};

pub(crate) type WaitOutcome<T> = Result<Payload<T>, WaitError>;

/// Identifies one pending waiter within its delegate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct WaiterId(u64);

pub(crate) struct WaiterEntry<T: Message> {
    id: WaiterId,
    sender: oneshot::Sender<WaitOutcome<T>>,
    predicate: Arc<dyn Predicate<T>>,
    deadline: Option<Instant>,
}

impl<T: Message> WaiterEntry<T> {
    /// The deadline has passed, whether or not the `WaitFor` noticed yet.
    fn is_expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now > deadline)
    }

    /// The receiving `WaitFor` is gone (dropped, cancelled, or timed out), or
    /// can no longer accept a result.
    fn is_abandoned(&self, now: Instant) -> bool {
        self.sender.is_closed() || self.is_expired(now)
    }
}

/// State shared between a delegate, its clones, and its outstanding waiters.
pub(crate) struct Shared<T: Message> {
    pub(crate) config: DelegateConfig,
    pub(crate) state: Mutex<State<T>>,
}

impl<T: Message> Shared<T> {
    pub(crate) fn new(config: DelegateConfig) -> Self {
        Self {
            config,
            state: Mutex::new(State::default()),
        }
    }
}

pub(crate) struct State<T: Message> {
    listeners: HashMap<String, Vec<ListenerRef<T>>>,
    waiters: HashMap<String, Vec<WaiterEntry<T>>>,
    next_waiter_id: u64,
}

impl<T: Message> Default for State<T> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
            waiters: HashMap::new(),
            next_waiter_id: 0,
        }
    }
}

impl<T: Message> State<T> {
    // Listeners

    pub(crate) fn add_listener(&mut self, name: String, listener: ListenerRef<T>) -> usize {
        let entries = self.listeners.entry(name).or_default();
        entries.push(listener);
        entries.len()
    }

    pub(crate) fn remove_listener(&mut self, name: &str, listener: &ListenerRef<T>) -> bool {
        let Some(entries) = self.listeners.get_mut(name) else {
            return false;
        };
        let Some(position) = entries.iter().position(|entry| entry == listener) else {
            return false;
        };
        entries.remove(position);
        if entries.is_empty() {
            self.listeners.remove(name);
        }
        true
    }

    pub(crate) fn listeners_for(&self, name: &str) -> Vec<ListenerRef<T>> {
        self.listeners.get(name).cloned().unwrap_or_default()
    }

    pub(crate) fn listener_count(&self, name: &str) -> usize {
        self.listeners.get(name).map_or(0, Vec::len)
    }

    // Waiters

    pub(crate) fn add_waiter(
        &mut self,
        name: String,
        sender: oneshot::Sender<WaitOutcome<T>>,
        predicate: Arc<dyn Predicate<T>>,
        deadline: Option<Instant>,
    ) -> WaiterId {
        let id = WaiterId(self.next_waiter_id);
        self.next_waiter_id += 1;
        self.waiters.entry(name).or_default().push(WaiterEntry {
            id,
            sender,
            predicate,
            deadline,
        });
        id
    }

    pub(crate) fn remove_waiter(&mut self, name: &str, id: WaiterId) -> bool {
        self.take_waiter(name, id).is_some()
    }

    /// Detach a waiter so its sender can be completed outside the lock.
    ///
    /// A waiter whose deadline passed is still removed, but no sender is
    /// returned: dropping it is what tells the `WaitFor` it timed out.
    pub(crate) fn take_waiter(
        &mut self,
        name: &str,
        id: WaiterId,
    ) -> Option<oneshot::Sender<WaitOutcome<T>>> {
        let entries = self.waiters.get_mut(name)?;
        let position = entries.iter().position(|entry| entry.id == id)?;
        let entry = entries.remove(position);
        if entries.is_empty() {
            self.waiters.remove(name);
        }
        (!entry.is_expired(Instant::now())).then_some(entry.sender)
    }

    /// Snapshot the live waiters for `name`, dropping abandoned and expired
    /// ones first.
    pub(crate) fn pending_waiters(&mut self, name: &str) -> Vec<(WaiterId, Arc<dyn Predicate<T>>)> {
        self.prune(name);
        self.waiters
            .get(name)
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| (entry.id, Arc::clone(&entry.predicate)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn waiter_count(&mut self, name: &str) -> usize {
        self.prune(name);
        self.waiters.get(name).map_or(0, Vec::len)
    }

    /// Drop every waiter whose `WaitFor` no longer exists or whose deadline
    /// has passed. Returns how many were removed.
    pub(crate) fn prune(&mut self, name: &str) -> usize {
        let Some(entries) = self.waiters.get_mut(name) else {
            return 0;
        };
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|entry| !entry.is_abandoned(now));
        let pruned = before - entries.len();
        if entries.is_empty() {
            self.waiters.remove(name);
        }
        pruned
    }

    pub(crate) fn event_names(&mut self) -> Vec<String> {
        let waiting: Vec<String> = self.waiters.keys().cloned().collect();
        for name in &waiting {
            self.prune(name);
        }
        let mut names: Vec<String> = self
            .listeners
            .keys()
            .chain(self.waiters.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
