//! Template discovery on disk and logical-name resolution.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::EngineError;

/// Read every file under `template_dir` whose name ends with one of `extensions`.
///
/// Returns `(name, source)` pairs where `name` is the path relative to
/// `template_dir`, joined with `/`, sorted by name. Symbolic links are not
/// followed.
pub(crate) fn collect_templates(
    template_dir: &Path,
    extensions: &[String],
) -> Result<Vec<(String, String)>, EngineError> {
    let mut templates = Vec::new();

    for entry in WalkDir::new(template_dir).follow_links(false) {
        let entry = entry.map_err(|e| EngineError::Io {
            path: e
                .path()
                .map_or_else(|| template_dir.to_path_buf(), Path::to_path_buf),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = relative_name(template_dir, entry.path()) else {
            continue;
        };
        if !has_extension(&name, extensions) {
            continue;
        }

        let source = fs::read_to_string(entry.path()).map_err(|source| EngineError::Io {
            path: entry.path().to_path_buf(),
            source,
        })?;
        templates.push((name, source));
    }

    templates.sort_by(|a, b| a.0.cmp(&b.0));
    tracing::debug!(
        dir = %template_dir.display(),
        count = templates.len(),
        "Collected templates"
    );
    Ok(templates)
}

/// Resolve a logical template name against the names an engine has loaded.
///
/// The name itself wins; otherwise each extension is appended in order.
pub(crate) fn resolve_name(
    template: &str,
    extensions: &[String],
    exists: impl Fn(&str) -> bool,
) -> Option<String> {
    if exists(template) {
        return Some(template.to_string());
    }
    extensions
        .iter()
        .map(|ext| format!("{template}{ext}"))
        .find(|candidate| exists(candidate))
}

pub(crate) fn has_extension(name: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

pub(crate) fn owned_extensions(extensions: &[impl AsRef<str>]) -> Vec<String> {
    extensions.iter().map(|e| e.as_ref().to_string()).collect()
}

fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let relative: PathBuf = path.strip_prefix(root).ok()?.to_path_buf();
    let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}
