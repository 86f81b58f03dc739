//! The event record that travels through a render call.

use serde_json::Value;
use viewkit_events::Event;
use viewkit_templating::Parameters;

/// Mutable state of a single render call, shared by every listener.
///
/// Listeners may swap the template, edit parameters, or supply the output
/// directly through [`set_result`](Self::set_result).
#[derive(Debug, Clone, PartialEq)]
pub struct RenderEvent {
    name: String,
    template: String,
    parameters: Parameters,
    result: Option<Value>,
    propagation_stopped: bool,
}

impl RenderEvent {
    /// Create an event for view `name`; the template defaults to the name.
    pub fn new(name: impl Into<String>, parameters: Parameters) -> Self {
        let name = name.into();
        Self {
            template: name.clone(),
            name,
            parameters,
            result: None,
            propagation_stopped: false,
        }
    }

    /// The view identifier originally requested.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The template that will be rendered if no listener supplies a result.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn set_template(&mut self, template: impl Into<String>) {
        self.template = template.into();
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    /// Insert or replace a single parameter.
    pub fn set_parameter(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.parameters.insert(key.into(), value.into());
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Supply the render output. The last listener to set it wins.
    pub fn set_result(&mut self, result: impl Into<Value>) {
        self.result = Some(result.into());
    }

    /// Whether a listener supplied a usable result.
    ///
    /// An explicit `null` counts as no result, so the template still renders.
    pub fn has_result(&self) -> bool {
        !matches!(self.result, None | Some(Value::Null))
    }

    /// Consume the event, returning the listener-supplied result if any.
    pub fn into_result(self) -> Option<Value> {
        self.result.filter(|value| !value.is_null())
    }
}

impl Event for RenderEvent {
    fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}
