//! View helper capability.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::HelperError;

/// A named, invocable capability exposed to templates.
///
/// Helpers receive positional JSON arguments and return a JSON value. The
/// trait is object-safe so registries can hold `Arc<dyn Helper>`.
pub trait Helper: Send + Sync {
    /// Name under which templates reach the helper.
    fn name(&self) -> &str;

    /// Invoke the helper with positional arguments.
    fn call(&self, args: &[Value]) -> Result<Value, HelperError>;

    /// Whether string output is trusted markup that autoescaping must leave intact.
    fn is_safe(&self) -> bool {
        false
    }

    /// Concrete type name, used in registration errors.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Registered helpers keyed by name.
pub type Helpers = BTreeMap<String, Arc<dyn Helper>>;

/// Helper backed by a closure.
pub struct FnHelper<F> {
    name: String,
    func: F,
    safe: bool,
}

impl<F> FnHelper<F>
where
    F: Fn(&[Value]) -> Result<Value, HelperError> + Send + Sync,
{
    /// Create a helper called `name` that delegates to `func`.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            safe: false,
        }
    }

    /// Mark the helper's output as safe markup.
    #[must_use]
    pub fn safe(mut self) -> Self {
        self.safe = true;
        self
    }
}

impl<F> Helper for FnHelper<F>
where
    F: Fn(&[Value]) -> Result<Value, HelperError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, args: &[Value]) -> Result<Value, HelperError> {
        (self.func)(args)
    }

    fn is_safe(&self) -> bool {
        self.safe
    }

    fn type_name(&self) -> &'static str {
        "FnHelper"
    }
}

impl<F> fmt::Debug for FnHelper<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHelper")
            .field("name", &self.name)
            .field("safe", &self.safe)
            .finish()
    }
}
