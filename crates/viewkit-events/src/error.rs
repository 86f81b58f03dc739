//! Dispatch error types.

use thiserror::Error;

/// A listener failed while an event was being dispatched.
///
/// Dispatch stops at the failing listener; listeners registered after it never
/// run and the event payload is dropped.
#[derive(Debug, Error)]
#[error("listener for '{event}' (priority {priority}) failed: {source}")]
pub struct DispatchError {
    /// Full event name the listener was registered under.
    pub event: String,
    /// Priority of the failing listener.
    pub priority: i32,
    /// Error returned by the listener.
    #[source]
    pub source: anyhow::Error,
}

impl DispatchError {
    /// Create a dispatch error for the given event name and priority.
    pub fn new(event: impl Into<String>, priority: i32, source: anyhow::Error) -> Self {
        Self {
            event: event.into(),
            priority,
            source,
        }
    }
}
