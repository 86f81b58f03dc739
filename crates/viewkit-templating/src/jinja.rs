//! MiniJinja-based engine for Jinja2-style views.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use minijinja::value::{Object, ObjectRepr, Value as JinjaValue};
use minijinja::{AutoEscape, Environment, Error, ErrorKind, State};

use crate::engine::Engine;
use crate::error::EngineError;
use crate::filters;
use crate::helper::{Helper, Helpers};
use crate::loader::{collect_templates, owned_extensions, resolve_name};
use crate::Parameters;

/// Extensions a [`JinjaEngine`] loads and appends when resolving names.
pub const DEFAULT_JINJA_EXTENSIONS: &[&str] = &[".html.j2", ".j2", ".jinja"];

/// Engine rendering Jinja2 templates through MiniJinja.
///
/// Templates are compiled once into an owned environment. Helpers are handed
/// to each render through the template context, next to the parameters.
#[derive(Debug)]
pub struct JinjaEngine {
    env: Environment<'static>,
    names: BTreeSet<String>,
    extensions: Vec<String>,
}

impl JinjaEngine {
    /// Load every `.html.j2` / `.j2` / `.jinja` file under `template_dir`.
    pub fn load(template_dir: &Path) -> Result<Self, EngineError> {
        Self::load_with_extensions(template_dir, DEFAULT_JINJA_EXTENSIONS)
    }

    /// Load every file under `template_dir` ending with one of `extensions`.
    pub fn load_with_extensions(
        template_dir: &Path,
        extensions: &[impl AsRef<str>],
    ) -> Result<Self, EngineError> {
        let extensions = owned_extensions(extensions);
        let templates = collect_templates(template_dir, &extensions)?;
        Self::build(templates.into_iter().collect(), extensions)
    }

    /// Build an engine from in-memory `(name, source)` pairs.
    pub fn from_templates<I, N, S>(templates: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let sources = templates
            .into_iter()
            .map(|(name, source)| (name.into(), source.into()))
            .collect();
        Self::build(sources, owned_extensions(DEFAULT_JINJA_EXTENSIONS))
    }

    fn build(
        sources: BTreeMap<String, String>,
        extensions: Vec<String>,
    ) -> Result<Self, EngineError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(auto_escape_for);
        filters::register_jinja(&mut env);

        let mut names = BTreeSet::new();
        for (name, source) in sources {
            env.add_template_owned(name.clone(), source)
                .map_err(|e| EngineError::load(name.clone(), e))?;
            names.insert(name);
        }

        tracing::debug!(templates = names.len(), "Loaded Jinja templates");
        Ok(Self {
            env,
            names,
            extensions,
        })
    }

    /// Names of every loaded template.
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    fn resolve(&self, template: &str) -> Option<String> {
        resolve_name(template, &self.extensions, |candidate| {
            self.names.contains(candidate)
        })
    }
}

/// Render context: helpers as callable values, shadowed by parameters of the
/// same name.
fn render_context(parameters: &Parameters, helpers: &Helpers) -> JinjaValue {
    helpers
        .iter()
        .map(|(name, helper)| {
            (
                name.clone(),
                JinjaValue::from_object(HelperObject(Arc::clone(helper))),
            )
        })
        .chain(
            parameters
                .iter()
                .map(|(key, value)| (key.clone(), JinjaValue::from_serialize(value))),
        )
        .collect()
}

impl Engine for JinjaEngine {
    fn name(&self) -> &str {
        "jinja"
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
        let tmpl = self
            .env
            .get_template(&resolved)
            .map_err(|e| EngineError::render(template, e))?;

        tracing::trace!(template = %resolved, helpers = helpers.len(), "Rendering Jinja template");
        tmpl.render(render_context(parameters, helpers))
            .map_err(|e| EngineError::render(template, e))
    }
}

fn auto_escape_for(name: &str) -> AutoEscape {
    let base = name
        .strip_suffix(".j2")
        .or_else(|| name.strip_suffix(".jinja"))
        .unwrap_or(name);
    if [".html", ".htm", ".xml"].iter().any(|ext| base.ends_with(ext)) {
        AutoEscape::Html
    } else {
        AutoEscape::None
    }
}

/// A helper exposed as a template value.
///
/// Reading it (`{{ trans }}`) or calling it without arguments yields the
/// helper itself, which renders as its name; calling it with arguments
/// invokes it. String results of safe helpers are marked safe.
struct HelperObject(Arc<dyn Helper>);

impl fmt::Debug for HelperObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HelperObject").field(&self.0.name()).finish()
    }
}

impl Object for HelperObject {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn call(
        self: &Arc<Self>,
        _state: &State<'_, '_>,
        args: &[JinjaValue],
    ) -> Result<JinjaValue, Error> {
        if args.is_empty() {
            return Ok(JinjaValue::from_object(HelperObject(Arc::clone(&self.0))));
        }

        let json_args = args
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))?;
        let result = self.0.call(&json_args).map_err(|e| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!("helper '{}' failed: {e}", self.0.name()),
            )
        })?;
        Ok(match result {
            serde_json::Value::String(s) if self.0.is_safe() => JinjaValue::from_safe_string(s),
            other => JinjaValue::from_serialize(&other),
        })
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        Self: Sized + 'static,
    {
        f.write_str(self.0.name())
    }
}
