//! Priority-ordered event dispatcher.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::DispatchError;

/// A payload that can travel through an [`EventDispatcher`].
pub trait Event {
    /// Whether a listener has asked for dispatch to stop.
    fn is_propagation_stopped(&self) -> bool;

    /// Prevent any further listener from receiving this event.
    fn stop_propagation(&mut self);
}

/// A registered event listener.
pub type Listener<E> = Arc<dyn Fn(&mut E) -> anyhow::Result<()> + Send + Sync>;

/// Handle returned by [`EventDispatcher::add_listener`], used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Registration<E> {
    id: ListenerId,
    listener: Listener<E>,
}

/// Priority buckets for a single event name, highest priority first.
type Buckets<E> = BTreeMap<Reverse<i32>, Vec<Registration<E>>>;

/// Publish/subscribe channel keyed by event name.
pub struct EventDispatcher<E> {
    listeners: HashMap<String, Buckets<E>>,
    next_id: u64,
}

impl<E> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<E> fmt::Debug for EventDispatcher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(name, buckets)| (name.as_str(), buckets.values().map(Vec::len).sum()))
            .collect();
        f.debug_struct("EventDispatcher")
            .field("listeners", &counts)
            .finish()
    }
}

impl<E: Event> EventDispatcher<E> {
    /// Create a dispatcher with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event_name`.
    ///
    /// Higher priorities run first. Listeners sharing a priority run in the
    /// order they were added.
    pub fn add_listener<F>(
        &mut self,
        event_name: impl Into<String>,
        listener: F,
        priority: i32,
    ) -> ListenerId
    where
        F: Fn(&mut E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let event_name = event_name.into();
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        tracing::debug!(event = %event_name, priority, ?id, "Registered listener");

        self.listeners
            .entry(event_name)
            .or_default()
            .entry(Reverse(priority))
            .or_default()
            .push(Registration {
                id,
                listener: Arc::new(listener),
            });
        id
    }

    /// Remove a previously registered listener. Returns `false` if the id is unknown.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let mut removed = false;
        for buckets in self.listeners.values_mut() {
            for registrations in buckets.values_mut() {
                let before = registrations.len();
                registrations.retain(|r| r.id != id);
                removed |= registrations.len() != before;
            }
            buckets.retain(|_, registrations| !registrations.is_empty());
        }
        self.listeners.retain(|_, buckets| !buckets.is_empty());

        if removed {
            tracing::debug!(?id, "Removed listener");
        }
        removed
    }

    /// Whether anything listens on `event_name`.
    pub fn has_listeners(&self, event_name: &str) -> bool {
        self.listener_count(event_name) > 0
    }

    /// Number of listeners registered for `event_name`.
    pub fn listener_count(&self, event_name: &str) -> usize {
        self.listeners
            .get(event_name)
            .map(|buckets| buckets.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Listeners for `event_name` in the order they would be invoked.
    pub fn listeners(&self, event_name: &str) -> Vec<(i32, Listener<E>)> {
        self.listeners
            .get(event_name)
            .into_iter()
            .flat_map(|buckets| buckets.iter())
            .flat_map(|(Reverse(priority), registrations)| {
                registrations
                    .iter()
                    .map(move |r| (*priority, Arc::clone(&r.listener)))
            })
            .collect()
    }

    /// Deliver `event` to every listener of `event_name` and hand it back.
    ///
    /// Stops early once the event reports propagation stopped. A listener
    /// error aborts the dispatch and is returned with the event name attached.
    pub fn dispatch(&self, event_name: &str, mut event: E) -> Result<E, DispatchError> {
        let Some(buckets) = self.listeners.get(event_name) else {
            tracing::trace!(event = event_name, "No listeners registered");
            return Ok(event);
        };

        for (Reverse(priority), registrations) in buckets {
            for registration in registrations {
                if event.is_propagation_stopped() {
                    tracing::debug!(event = event_name, "Propagation stopped");
                    return Ok(event);
                }
                tracing::trace!(
                    event = event_name,
                    priority = *priority,
                    id = ?registration.id,
                    "Invoking listener"
                );
                (registration.listener)(&mut event)
                    .map_err(|source| DispatchError::new(event_name, *priority, source))?;
            }
        }

        Ok(event)
    }
}
