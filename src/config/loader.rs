//! Config file discovery and loading for `viewkit.toml`.
//!
//! Checks two locations in precedence order:
//! 1. The path in `$VIEWKIT_CONFIG`
//! 2. `./viewkit.toml` (project-local)

use std::path::PathBuf;

use super::ViewConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "VIEWKIT_CONFIG";
/// Project-local config filename.
pub const CONFIG_FILENAME: &str = "viewkit.toml";

/// Load view config from the first discovered location, or return defaults.
///
/// Unreadable or malformed files are logged and skipped.
pub fn load_view_config() -> ViewConfig {
    if let Some(path) = find_config_file() {
        match ViewConfig::from_path(&path) {
            Ok(config) => {
                tracing::debug!(?path, "Loaded view config");
                return config;
            }
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to load view config, using defaults");
            }
        }
    }
    ViewConfig::default()
}

/// Search for config file in precedence order.
fn find_config_file() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from) {
        if explicit.is_file() {
            return Some(explicit);
        }
        tracing::warn!(path = ?explicit, "{CONFIG_ENV_VAR} does not point at a file");
    }

    let local = PathBuf::from(CONFIG_FILENAME);
    local.is_file().then_some(local)
}
