use std::collections::HashMap;

use serde_json::Value;
use viewkit_templating::{Helper, HelperError};

use super::display_text;

/// `trans(id, placeholders?)`: looks a message up in the catalogue.
///
/// Unknown ids translate to themselves. Placeholders are written as `%key%`
/// or `{key}` and filled from the optional object argument.
#[derive(Debug, Clone, Default)]
pub struct TranslateHelper {
    messages: HashMap<String, String>,
}

impl TranslateHelper {
    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    /// Add or replace a single catalogue entry.
    pub fn insert(&mut self, id: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(id.into(), message.into());
    }

    /// Translate `id`, substituting `placeholders`.
    pub fn translate(
        &self,
        id: &str,
        placeholders: Option<&serde_json::Map<String, Value>>,
    ) -> String {
        let mut message = self
            .messages
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string());

        for (key, value) in placeholders.into_iter().flatten() {
            let text = display_text(value);
            message = message
                .replace(&format!("%{key}%"), &text)
                .replace(&format!("{{{key}}}"), &text);
        }
        message
    }
}

impl Helper for TranslateHelper {
    fn name(&self) -> &str {
        "trans"
    }

    fn call(&self, args: &[Value]) -> Result<Value, HelperError> {
        let id = args
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| HelperError::invalid_argument(0, "expected a message id string"))?;

        let placeholders = match args.get(1) {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => {
                return Err(HelperError::invalid_argument(
                    1,
                    "expected an object of placeholder values",
                ))
            }
        };

        Ok(Value::String(self.translate(id, placeholders)))
    }
}
