//! The engine contract consumed by the view facade.

use std::fmt;

use crate::error::EngineError;
use crate::helper::Helpers;
use crate::Parameters;

/// A template engine that can render some set of template identifiers.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn Engine`.
pub trait Engine: Send + Sync + fmt::Debug {
    /// Engine name, for logging.
    fn name(&self) -> &str;

    /// Whether this engine can render `template`.
    fn supports(&self, template: &str) -> bool;

    /// Render `template` with `parameters`, exposing `helpers` to the template.
    fn render(
        &self,
        template: &str,
        parameters: &Parameters,
        helpers: &Helpers,
    ) -> Result<String, EngineError>;
}
