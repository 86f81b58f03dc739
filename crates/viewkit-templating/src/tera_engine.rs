//! Tera-based engine with case filters and helper functions.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::{Map, Value};
use tera::{Context, Tera};

use crate::engine::Engine;
use crate::error::EngineError;
use crate::filters;
use crate::helper::{Helper, Helpers};
use crate::loader::{collect_templates, owned_extensions, resolve_name};
use crate::Parameters;

/// Extensions a [`TeraEngine`] loads and appends when resolving names.
pub const DEFAULT_TERA_EXTENSIONS: &[&str] = &[".html.tera", ".tera"];

/// Template suffixes rendered with HTML auto-escaping.
const AUTOESCAPE_SUFFIXES: &[&str] = &[".html", ".htm", ".xml", ".html.tera"];

/// Names paired with helper allocations; identifies a helper set.
type HelperKey = Vec<(String, usize)>;

fn helper_key(helpers: &Helpers) -> HelperKey {
    helpers
        .iter()
        .map(|(name, helper)| (name.clone(), Arc::as_ptr(helper) as *const () as usize))
        .collect()
}

/// Compiled templates with one helper set registered as functions.
#[derive(Debug)]
struct BoundTera {
    key: HelperKey,
    tera: Arc<Tera>,
}

/// Engine wrapping a Tera instance.
///
/// Helpers are registered on a copy of the compiled templates the first time
/// a helper set is seen; later renders with the same set reuse that copy.
#[derive(Debug)]
pub struct TeraEngine {
    tera: Arc<Tera>,
    extensions: Vec<String>,
    bound: RwLock<Option<BoundTera>>,
    binds: AtomicUsize,
}

impl TeraEngine {
    /// Load every `.html.tera` / `.tera` file under `template_dir`.
    pub fn load(template_dir: &Path) -> Result<Self, EngineError> {
        Self::load_with_extensions(template_dir, DEFAULT_TERA_EXTENSIONS)
    }

    /// Load every file under `template_dir` ending with one of `extensions`.
    pub fn load_with_extensions(
        template_dir: &Path,
        extensions: &[impl AsRef<str>],
    ) -> Result<Self, EngineError> {
        let extensions = owned_extensions(extensions);
        let templates = collect_templates(template_dir, &extensions)?;
        Self::build(templates, extensions)
    }

    /// Build an engine from in-memory `(name, source)` pairs.
    pub fn from_templates<I, N, S>(templates: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let templates = templates
            .into_iter()
            .map(|(name, source)| (name.into(), source.into()))
            .collect();
        Self::build(templates, owned_extensions(DEFAULT_TERA_EXTENSIONS))
    }

    fn build(
        templates: Vec<(String, String)>,
        extensions: Vec<String>,
    ) -> Result<Self, EngineError> {
        let mut tera = Tera::default();
        tera.autoescape_on(AUTOESCAPE_SUFFIXES.to_vec());
        filters::register_tera(&mut tera);

        // Added as one batch so inheritance between templates resolves.
        let names = templates
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        tera.add_raw_templates(templates)
            .map_err(|e| EngineError::load(names, e))?;

        tracing::debug!(
            templates = tera.get_template_names().count(),
            "Loaded Tera templates"
        );
        Ok(Self {
            tera: Arc::new(tera),
            extensions,
            bound: RwLock::new(None),
            binds: AtomicUsize::new(0),
        })
    }

    /// Names of every loaded template.
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.tera.get_template_names()
    }

    /// Extensions used for name resolution.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn resolve(&self, template: &str) -> Option<String> {
        resolve_name(template, &self.extensions, |candidate| {
            self.tera.get_template_names().any(|n| n == candidate)
        })
    }

    /// Templates with `helpers` available as functions.
    fn tera_for(&self, helpers: &Helpers) -> Arc<Tera> {
        if helpers.is_empty() {
            return Arc::clone(&self.tera);
        }

        let key = helper_key(helpers);
        if let Some(bound) = self
            .bound
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|bound| bound.key == key)
        {
            return Arc::clone(&bound.tera);
        }

        let mut tera = Tera::clone(&self.tera);
        for (name, helper) in helpers {
            tera.register_function(name, TeraHelper(Arc::clone(helper)));
        }
        let tera = Arc::new(tera);
        self.binds.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(helpers = helpers.len(), "Bound helpers to Tera templates");

        *self.bound.write().unwrap_or_else(PoisonError::into_inner) = Some(BoundTera {
            key,
            tera: Arc::clone(&tera),
        });
        tera
    }

    #[cfg(test)]
    fn helper_binds(&self) -> usize {
        self.binds.load(Ordering::Relaxed)
    }
}

impl Engine for TeraEngine {
    fn name(&self) -> &str {
        "tera"
    }

    fn supports(&self, template: &str) -> bool {
        self.resolve(template).is_some()
    }

    fn render(
        &self,
        template: &str,
        parameters: &Parameters,
        helpers: &Helpers,
    ) -> Result<String, EngineError> {
        let resolved = self
            .resolve(template)
            .ok_or_else(|| EngineError::NotFound(template.to_string()))?;

        let mut context = Context::new();
        for (key, value) in parameters {
            context.insert(key, value);
        }

        tracing::trace!(template = %resolved, helpers = helpers.len(), "Rendering Tera template");
        self.tera_for(helpers)
            .render(&resolved, &context)
            .map_err(|e| EngineError::render(template, e))
    }
}

/// Adapts a [`Helper`] to Tera's named-argument function interface.
///
/// Tera only passes named arguments: `args=[...]` supplies positional
/// arguments, any other named arguments are passed as a single object, and a
/// call without arguments yields the helper's name since Tera has no callable
/// values. Output of safe helpers bypasses autoescaping.
struct TeraHelper(Arc<dyn Helper>);

impl tera::Function for TeraHelper {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        if args.is_empty() {
            return Ok(Value::String(self.0.name().to_string()));
        }

        let positional = match args.get("args") {
            Some(Value::Array(items)) if args.len() == 1 => items.clone(),
            _ => {
                let mut keys: Vec<&String> = args.keys().collect();
                keys.sort();
                let object: Map<String, Value> = keys
                    .into_iter()
                    .map(|k| (k.clone(), args[k].clone()))
                    .collect();
                vec![Value::Object(object)]
            }
        };

        self.0
            .call(&positional)
            .map_err(|e| tera::Error::msg(format!("helper '{}' failed: {e}", self.0.name())))
    }

    fn is_safe(&self) -> bool {
        self.0.is_safe()
    }
}
