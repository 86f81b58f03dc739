//! Event dispatch for viewkit.
//!
//! A small publish/subscribe channel keyed by string event names. Listeners are
//! registered with an integer priority and run in descending priority order,
//! with ties resolved by registration order. Any listener may stop propagation,
//! after which no further listener sees the event for that dispatch.
//!
//! The dispatcher is generic over the event payload: [`EventDispatcher::dispatch`]
//! takes the payload by value and hands it back once every listener has had a
//! chance to mutate it, which makes the read-back explicit in the signature.
//!
//! # Modules
//!
//! - [`dispatcher`]: listener registration and dispatch
//! - [`error`]: listener failure reporting

pub mod dispatcher;
pub mod error;

pub use dispatcher::{Event, EventDispatcher, Listener, ListenerId};
pub use error::DispatchError;
