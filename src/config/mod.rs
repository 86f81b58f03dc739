//! View configuration: event prefix, template locations, globals, translations.
//!
//! Read from `viewkit.toml` (kebab-case keys) or assembled with
//! [`ViewConfig::builder`]. See [`loader`] for discovery rules.

pub(crate) mod loader;

pub use loader::{load_view_config, CONFIG_ENV_VAR, CONFIG_FILENAME};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bon::Builder;
use serde::Deserialize;
use viewkit_templating::{Parameters, DEFAULT_JINJA_EXTENSIONS, DEFAULT_TERA_EXTENSIONS};

/// Prefix prepended to every event name the view dispatches.
pub const DEFAULT_EVENT_PREFIX: &str = "view.";

fn default_event_prefix() -> String {
    DEFAULT_EVENT_PREFIX.to_string()
}

fn default_tera_extensions() -> Vec<String> {
    DEFAULT_TERA_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_jinja_extensions() -> Vec<String> {
    DEFAULT_JINJA_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_editor_class() -> String {
    "editor".to_string()
}

/// Settings used by [`View::from_config`](crate::View::from_config).
#[derive(Debug, Clone, Deserialize, Builder)]
#[serde(rename_all = "kebab-case")]
#[builder(on(String, into))]
pub struct ViewConfig {
    /// Event name prefix. Default: `"view."`.
    #[serde(default = "default_event_prefix")]
    #[builder(default = default_event_prefix())]
    pub event_prefix: String,

    /// Directories scanned for templates, in engine priority order.
    #[serde(default)]
    #[builder(default)]
    pub template_paths: Vec<PathBuf>,

    /// File extensions rendered by the Tera engine.
    #[serde(default = "default_tera_extensions")]
    #[builder(default = default_tera_extensions())]
    pub tera_extensions: Vec<String>,

    /// File extensions rendered by the MiniJinja engine.
    #[serde(default = "default_jinja_extensions")]
    #[builder(default = default_jinja_extensions())]
    pub jinja_extensions: Vec<String>,

    /// CSS class the `editor` helper applies by default.
    #[serde(default = "default_editor_class")]
    #[builder(default = default_editor_class())]
    pub editor_class: String,

    /// Parameters merged into every render.
    #[serde(default)]
    #[builder(default)]
    pub globals: Parameters,

    /// Message catalogue for the `trans` helper.
    #[serde(default)]
    #[builder(default)]
    pub translations: HashMap<String, String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ViewConfig {
    /// Parse a configuration document.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
