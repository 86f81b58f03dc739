//! Composite engine that routes templates to the first capable sub-engine.

use crate::engine::Engine;
use crate::error::EngineError;
use crate::helper::Helpers;
use crate::Parameters;

/// Tries registered engines in order and delegates to the first that supports
/// a template.
#[derive(Debug, Default)]
pub struct DelegatingEngine {
    engines: Vec<Box<dyn Engine>>,
}

impl DelegatingEngine {
    /// Create a delegator with no sub-engines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a delegator from an ordered list of engines.
    pub fn with_engines(engines: Vec<Box<dyn Engine>>) -> Self {
        Self { engines }
    }

    /// Append an engine. Earlier engines win when several support a template.
    pub fn add_engine<E: Engine + 'static>(&mut self, engine: E) {
        self.add_boxed_engine(Box::new(engine));
    }

    /// Append an already boxed engine.
    pub fn add_boxed_engine(&mut self, engine: Box<dyn Engine>) {
        tracing::debug!(engine = engine.name(), position = self.engines.len(), "Added engine");
        self.engines.push(engine);
    }

    /// Registered engines in priority order.
    pub fn engines(&self) -> impl Iterator<Item = &dyn Engine> {
        self.engines.iter().map(|e| e.as_ref())
    }

    /// Number of registered engines.
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Whether no engine has been registered.
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// The engine that would render `template`, if any.
    pub fn engine_for(&self, template: &str) -> Option<&dyn Engine> {
        self.engines().find(|engine| engine.supports(template))
    }
}

impl Engine for DelegatingEngine {
    fn name(&self) -> &str {
        "delegating"
    }

    fn supports(&self, template: &str) -> bool {
        self.engine_for(template).is_some()
    }

    fn render(
        &self,
        template: &str,
        parameters: &Parameters,
        helpers: &Helpers,
    ) -> Result<String, EngineError> {
        let engine = self
            .engine_for(template)
            .ok_or_else(|| EngineError::Unsupported(template.to_string()))?;
        tracing::debug!(template, engine = engine.name(), "Delegating render");
        engine.render(template, parameters, helpers)
    }
}
