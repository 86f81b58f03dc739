//! The view facade: parameter merging, render events, helpers, and engine delegation.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use viewkit_events::{Event, EventDispatcher, ListenerId};
use viewkit_templating::{
    DelegatingEngine, Engine, Helper, Helpers, JinjaEngine, Parameters, TeraEngine,
};

use crate::config::{ViewConfig, DEFAULT_EVENT_PREFIX};
use crate::error::{ViewError, ViewResult};
use crate::event::RenderEvent;
use crate::helpers::{validate_helper_name, EditorHelper, TranslateHelper};

/// Result of [`View::invoke_helper`].
///
/// Invoking without arguments hands back the helper itself; invoking with
/// arguments calls it.
#[derive(Clone)]
pub enum HelperValue {
    Helper(Arc<dyn Helper>),
    Value(Value),
}

impl HelperValue {
    /// The computed value, if the helper was called.
    pub fn into_value(self) -> Option<Value> {
        match self {
            HelperValue::Value(value) => Some(value),
            HelperValue::Helper(_) => None,
        }
    }

    /// The helper object, if it was read rather than called.
    pub fn as_helper(&self) -> Option<&Arc<dyn Helper>> {
        match self {
            HelperValue::Helper(helper) => Some(helper),
            HelperValue::Value(_) => None,
        }
    }
}

impl fmt::Debug for HelperValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HelperValue::Helper(helper) => f.debug_tuple("Helper").field(&helper.name()).finish(),
            HelperValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// Renders named views through an event pipeline and a delegating engine.
///
/// Every render publishes a [`RenderEvent`] on `<prefix>render`, then, unless a
/// listener stopped propagation, on `<prefix><name>`. Listeners may rewrite
/// the template or parameters, or supply the output themselves; otherwise the
/// first engine that supports the template renders it.
pub struct View {
    events: EventDispatcher<RenderEvent>,
    engine: DelegatingEngine,
    globals: Parameters,
    helpers: Helpers,
    prefix: String,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("prefix", &self.prefix)
            .field("globals", &self.globals)
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .field("engine", &self.engine)
            .field("events", &self.events)
            .finish()
    }
}

impl View {
    /// Create a view with no listeners, no engines, and the default prefix.
    pub fn new() -> Self {
        Self::with_parts(EventDispatcher::new(), DelegatingEngine::new())
    }

    /// Create a view around caller-supplied collaborators.
    pub fn with_parts(events: EventDispatcher<RenderEvent>, engine: DelegatingEngine) -> Self {
        Self {
            events,
            engine,
            globals: Parameters::new(),
            helpers: Helpers::new(),
            prefix: DEFAULT_EVENT_PREFIX.to_string(),
        }
    }

    /// Replace the event name prefix.
    ///
    /// Listeners already registered keep their original full event names.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Build a view from configuration.
    ///
    /// Each template path contributes a Tera engine and a MiniJinja engine, in
    /// that order. Globals are seeded and the `trans` and `editor` helpers are
    /// registered.
    pub fn from_config(config: &ViewConfig) -> ViewResult<Self> {
        let mut view = Self::new().with_prefix(config.event_prefix.clone());

        for dir in &config.template_paths {
            view.add_engine(TeraEngine::load_with_extensions(
                dir,
                config.tera_extensions.as_slice(),
            )?);
            view.add_engine(JinjaEngine::load_with_extensions(
                dir,
                config.jinja_extensions.as_slice(),
            )?);
        }
        for (name, value) in &config.globals {
            view.add_global(name.clone(), value.clone());
        }
        view.add_helper(TranslateHelper::new(config.translations.clone()))?
            .add_helper(EditorHelper::new(config.editor_class.clone()))?;

        tracing::info!(
            prefix = %view.prefix,
            engines = view.engine.len(),
            globals = view.globals.len(),
            "View configured"
        );
        Ok(view)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Render view `name`.
    ///
    /// Globals are merged under `parameters` (parameters win). Returns the
    /// engine output, a listener-supplied result, or `None` when nothing
    /// handled the view.
    pub fn render(&self, name: &str, parameters: Parameters) -> ViewResult<Option<Value>> {
        let mut merged = self.globals.clone();
        merged.extend(parameters);

        let event = RenderEvent::new(name, merged);
        let mut event = self.events.dispatch(&self.channel("render"), event)?;

        if !event.is_propagation_stopped() {
            event = self.events.dispatch(&self.channel(name), event)?;
        }

        if !event.has_result() && self.engine.supports(event.template()) {
            tracing::debug!(view = name, template = event.template(), "Rendering via engine");
            let output = self
                .engine
                .render(event.template(), event.parameters(), &self.helpers)?;
            return Ok(Some(Value::String(output)));
        }

        tracing::debug!(
            view = name,
            handled = event.has_result(),
            "Returning listener result"
        );
        Ok(event.into_result())
    }

    /// Shorthand for [`render`](Self::render).
    pub fn call(&self, name: &str, parameters: Parameters) -> ViewResult<Option<Value>> {
        self.render(name, parameters)
    }

    /// Render and convert the output to text.
    ///
    /// String results are returned as-is; other JSON values are serialised.
    pub fn render_to_string(&self, name: &str, parameters: Parameters) -> ViewResult<Option<String>> {
        Ok(self.render(name, parameters)?.map(|value| match value {
            Value::String(s) => s,
            other => other.to_string(),
        }))
    }

    pub fn engine(&self) -> &DelegatingEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut DelegatingEngine {
        &mut self.engine
    }

    /// Register a sub-engine. Engines added earlier take precedence.
    pub fn add_engine<E: Engine + 'static>(&mut self, engine: E) -> &mut Self {
        self.engine.add_engine(engine);
        self
    }

    pub fn globals(&self) -> &Parameters {
        &self.globals
    }

    /// Set a parameter included in every render.
    pub fn add_global(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.globals.insert(name.into(), value.into());
        self
    }

    /// Register a helper, replacing any helper with the same name.
    pub fn add_helper<H: Helper + 'static>(&mut self, helper: H) -> ViewResult<&mut Self> {
        self.add_shared_helper(Arc::new(helper))
    }

    /// Register an already shared helper.
    pub fn add_shared_helper(&mut self, helper: Arc<dyn Helper>) -> ViewResult<&mut Self> {
        validate_helper_name(helper.name())
            .map_err(|reason| ViewError::invalid_helper(helper.type_name(), reason))?;

        let name = helper.name().to_string();
        if self.helpers.insert(name.clone(), helper).is_some() {
            tracing::debug!(helper = %name, "Replaced helper");
        } else {
            tracing::debug!(helper = %name, "Registered helper");
        }
        Ok(self)
    }

    /// Register helpers in order. Stops at the first invalid helper; helpers
    /// registered before it stay registered.
    pub fn add_helpers<I>(&mut self, helpers: I) -> ViewResult<&mut Self>
    where
        I: IntoIterator<Item = Arc<dyn Helper>>,
    {
        for helper in helpers {
            self.add_shared_helper(helper)?;
        }
        Ok(self)
    }

    pub fn helper(&self, name: &str) -> Option<&Arc<dyn Helper>> {
        self.helpers.get(name)
    }

    pub fn helpers(&self) -> &Helpers {
        &self.helpers
    }

    /// Read or call helper `name`.
    ///
    /// With no arguments the helper itself is returned; otherwise it is
    /// invoked with `args` and its result returned.
    pub fn invoke_helper(&self, name: &str, args: &[Value]) -> ViewResult<HelperValue> {
        let helper = self
            .helpers
            .get(name)
            .ok_or_else(|| ViewError::undefined_helper(name))?;

        if args.is_empty() {
            return Ok(HelperValue::Helper(Arc::clone(helper)));
        }

        helper
            .call(args)
            .map(HelperValue::Value)
            .map_err(|source| ViewError::Helper {
                name: name.to_string(),
                source,
            })
    }

    /// Listen on `<prefix><event>` at priority 0.
    pub fn on<F>(&mut self, event: &str, listener: F) -> ListenerId
    where
        F: Fn(&mut RenderEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.on_with_priority(event, listener, 0)
    }

    /// Listen on `<prefix><event>`; higher priorities run first.
    pub fn on_with_priority<F>(&mut self, event: &str, listener: F, priority: i32) -> ListenerId
    where
        F: Fn(&mut RenderEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let channel = self.channel(event);
        self.events.add_listener(channel, listener, priority)
    }

    /// Remove a listener registered through [`on`](Self::on).
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.remove_listener(id)
    }

    pub fn events(&self) -> &EventDispatcher<RenderEvent> {
        &self.events
    }

    fn channel(&self, event: &str) -> String {
        format!("{}{event}", self.prefix)
    }
}
