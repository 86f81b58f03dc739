//! Built-in view helpers and helper-name validation.
//!
//! - [`TranslateHelper`] (`trans`): message catalogue lookup with placeholders
//! - [`EditorHelper`] (`editor`): `<textarea>` markup for content editing

mod editor;
mod translate;

pub use editor::EditorHelper;
pub use translate::TranslateHelper;

/// Check that `name` can be referenced from a template.
///
/// Returns the reason on failure.
pub(crate) fn validate_helper_name(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err("helper name is empty".to_string());
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(format!(
            "helper name \"{name}\" must start with a letter or underscore"
        ));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(format!(
            "helper name \"{name}\" contains invalid character '{bad}'"
        ));
    }
    Ok(())
}

pub(crate) use tera::escape_html;

/// Render a JSON scalar as display text; strings are used verbatim.
pub(crate) fn display_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
