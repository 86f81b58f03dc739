use std::collections::BTreeMap;

use serde_json::Value;
use viewkit_templating::{Helper, HelperError};

use super::{display_text, escape_html};

/// `editor(name, value?, attributes?)`: renders a content-editing `<textarea>`.
///
/// `name` comes first; remaining attributes are emitted in key order. `true`
/// produces a bare attribute, `false` and `null` drop it. `class` defaults to
/// the helper's configured class unless the attributes override it.
#[derive(Debug, Clone)]
pub struct EditorHelper {
    class: String,
}

impl EditorHelper {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
        }
    }

    /// Default CSS class applied to rendered editors.
    pub fn class(&self) -> &str {
        &self.class
    }

    fn attributes(
        &self,
        extra: Option<&serde_json::Map<String, Value>>,
    ) -> Result<BTreeMap<String, Option<String>>, HelperError> {
        let mut attributes = BTreeMap::new();
        if !self.class.is_empty() {
            attributes.insert("class".to_string(), Some(self.class.clone()));
        }

        for (key, value) in extra.into_iter().flatten() {
            if key == "name" {
                continue;
            }
            if key.is_empty() || !key.chars().all(is_attribute_char) {
                return Err(HelperError::invalid_argument(
                    2,
                    format!("invalid attribute name \"{key}\""),
                ));
            }
            match value {
                Value::Bool(false) | Value::Null => {
                    attributes.remove(key);
                }
                Value::Bool(true) => {
                    attributes.insert(key.clone(), None);
                }
                other => {
                    attributes.insert(key.clone(), Some(display_text(other)));
                }
            }
        }
        Ok(attributes)
    }
}

impl Default for EditorHelper {
    fn default() -> Self {
        Self::new("editor")
    }
}

impl Helper for EditorHelper {
    fn name(&self) -> &str {
        "editor"
    }

    fn is_safe(&self) -> bool {
        true
    }

    fn call(&self, args: &[Value]) -> Result<Value, HelperError> {
        let name = args
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| HelperError::invalid_argument(0, "expected a field name string"))?;
        let content = args.get(1).map(display_text).unwrap_or_default();
        let extra = match args.get(2) {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => {
                return Err(HelperError::invalid_argument(
                    2,
                    "expected an object of attributes",
                ))
            }
        };

        let mut html = format!("<textarea name=\"{}\"", escape_html(name));
        for (key, value) in self.attributes(extra)? {
            match value {
                Some(value) => html.push_str(&format!(" {key}=\"{}\"", escape_html(&value))),
                None => html.push_str(&format!(" {key}")),
            }
        }
        html.push('>');
        html.push_str(&escape_html(&content));
        html.push_str("</textarea>");

        Ok(Value::String(html))
    }
}

fn is_attribute_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}
