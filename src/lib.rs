//! Event-driven view rendering with pluggable template engines.
//!
//! A [`View`] renders named views. Each call merges global parameters with the
//! caller's, publishes a [`RenderEvent`] on `view.render` and then on
//! `view.<name>`, and finally hands the (possibly rewritten) template to the
//! first engine that supports it, unless a listener already produced output.
//!
//! ```no_run
//! use serde_json::json;
//! use viewkit::{Parameters, View, ViewConfig};
//!
//! # fn main() -> viewkit::ViewResult<()> {
//! let config = ViewConfig::builder()
//!     .template_paths(vec!["./views".into()])
//!     .build();
//! let mut view = View::from_config(&config)?;
//! view.on("home", |event| {
//!     event.set_parameter("greeting", "Hello");
//!     Ok(())
//! });
//!
//! let params: Parameters = json!({"title": "Welcome"}).as_object().cloned().unwrap_or_default();
//! let html = view.render_to_string("home", params)?;
//! # let _ = html;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`config`]: `viewkit.toml` settings and discovery
//! - [`error`]: [`ViewError`] and [`ViewResult`]
//! - [`event`]: the [`RenderEvent`] passed to listeners
//! - [`helpers`]: built-in `trans` and `editor` helpers
//! - [`logging`]: tracing subscriber setup
//! - [`view`]: the [`View`] facade

pub mod config;
pub mod error;
pub mod event;
pub mod helpers;
pub mod logging;
pub mod view;

pub use config::{
    load_view_config, ConfigError, ViewConfig, CONFIG_ENV_VAR, CONFIG_FILENAME,
    DEFAULT_EVENT_PREFIX,
};
pub use error::{ViewError, ViewResult};
pub use event::RenderEvent;
pub use helpers::{EditorHelper, TranslateHelper};
pub use logging::init_tracing;
pub use view::{HelperValue, View};

pub use viewkit_events::{DispatchError, Event, EventDispatcher, ListenerId};
pub use viewkit_templating::{
    DelegatingEngine, Engine, EngineError, FnHelper, Helper, HelperError, Helpers, JinjaEngine,
    Parameters, TeraEngine,
};
