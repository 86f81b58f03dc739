//! Template engine abstraction for viewkit.
//!
//! An [`Engine`] decides whether it can render a template identifier and, if so,
//! renders it with a parameter map and the set of view helpers. The
//! [`DelegatingEngine`] composes several engines and routes each template to the
//! first one that supports it, in registration order.
//!
//! Two engines ship with the crate:
//!
//! - [`TeraEngine`]: Tera templates (`.html.tera`, `.tera`), with case-conversion
//!   filters and helpers exposed as Tera functions
//! - [`JinjaEngine`]: MiniJinja templates (`.html.j2`, `.j2`, `.jinja`), with
//!   helpers exposed as callable values
//!
//! Both resolve logical names: `home` finds `home.html.tera` when no template is
//! literally named `home`.

mod delegating;
mod engine;
mod error;
mod filters;
mod helper;
mod jinja;
mod loader;
mod tera_engine;

pub use delegating::DelegatingEngine;
pub use engine::Engine;
pub use error::{EngineError, HelperError};
pub use helper::{FnHelper, Helper, Helpers};
pub use jinja::{JinjaEngine, DEFAULT_JINJA_EXTENSIONS};
pub use tera_engine::{TeraEngine, DEFAULT_TERA_EXTENSIONS};

/// Parameters passed to a template: string keys mapped to arbitrary JSON values.
pub type Parameters = serde_json::Map<String, serde_json::Value>;
