//! Case-conversion filters shared by the Tera and MiniJinja engines.

use std::collections::HashMap;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase, ToTitleCase};
use tera::{Tera, Value};

/// Filter name paired with its string conversion.
pub(crate) const CASE_FILTERS: &[(&str, fn(&str) -> String)] = &[
    ("snake_case", |s: &str| s.to_snake_case()),
    ("pascal_case", |s: &str| s.to_pascal_case()),
    ("camel_case", |s: &str| s.to_lower_camel_case()),
    ("kebab_case", |s: &str| s.to_kebab_case()),
    ("title_case", |s: &str| s.to_title_case()),
];

/// Register every case filter on a Tera instance.
pub(crate) fn register_tera(tera: &mut Tera) {
    for &(name, convert) in CASE_FILTERS {
        tera.register_filter(
            name,
            move |value: &Value, _args: &HashMap<String, Value>| -> tera::Result<Value> {
                let s = value.as_str().ok_or_else(|| {
                    tera::Error::msg(format!("{name} filter expects a string, got {value}"))
                })?;
                Ok(Value::String(convert(s)))
            },
        );
    }
}

/// Register every case filter on a MiniJinja environment.
pub(crate) fn register_jinja(env: &mut minijinja::Environment<'_>) {
    for &(name, convert) in CASE_FILTERS {
        env.add_filter(name, move |value: String| convert(&value));
    }
}
