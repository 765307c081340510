use super::file::{upsert, RouteFormat};
use super::RouteEntry;
use crate::error::ConfigurationError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// JSON route document.
pub struct Json;

/// YAML route document, same shape as [`Json`].
pub struct Yaml;

impl RouteFormat for Json {
    const NAME: &'static str = "json";

    fn parse(content: &str, path: &Path) -> Result<Vec<RouteEntry>, ConfigurationError> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| ConfigurationError::parse(path, e.to_string()))?;
        entries_from_value(value, path)
    }
}

impl RouteFormat for Yaml {
    const NAME: &'static str = "yaml";

    fn parse(content: &str, path: &Path) -> Result<Vec<RouteEntry>, ConfigurationError> {
        let value: Value = serde_yaml::from_str(content)
            .map_err(|e| ConfigurationError::parse(path, e.to_string()))?;
        entries_from_value(value, path)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Definition {
    Pattern(String),
    Detailed(DetailedDefinition),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DetailedDefinition {
    pattern: String,
    #[serde(default)]
    defaults: Map<String, Value>,
    #[serde(default)]
    requirements: Map<String, Value>,
}

fn entries_from_value(value: Value, path: &Path) -> Result<Vec<RouteEntry>, ConfigurationError> {
    let routes = match value {
        Value::Object(routes) => routes,
        // an empty YAML document
        Value::Null => return Ok(Vec::new()),
        _ => {
            return Err(ConfigurationError::parse(
                path,
                "expected an object mapping route names to definitions",
            ))
        }
    };

    let mut entries = Vec::with_capacity(routes.len());
    for (name, definition) in routes {
        let definition: Definition = serde_json::from_value(definition).map_err(|_| {
            ConfigurationError::parse(
                path,
                format!(
                    "route '{name}': expected a pattern string or an object with \
                     `pattern`, `defaults` and `requirements`"
                ),
            )
        })?;

        let entry = match definition {
            Definition::Pattern(pattern) => RouteEntry::new(name, pattern),
            Definition::Detailed(detailed) => {
                let mut entry = RouteEntry::new(name.clone(), detailed.pattern);
                for (key, value) in detailed.defaults {
                    let value = scalar(&value).ok_or_else(|| {
                        ConfigurationError::parse(
                            path,
                            format!("route '{name}': default '{key}' must be a string, number or boolean"),
                        )
                    })?;
                    entry.defaults.insert(key, value);
                }
                for (key, value) in detailed.requirements {
                    let Value::String(constraint) = value else {
                        return Err(ConfigurationError::parse(
                            path,
                            format!("route '{name}': requirement '{key}' must be a string"),
                        ));
                    };
                    entry.requirements.push((key, constraint));
                }
                entry
            }
        };
        upsert(&mut entries, entry);
    }
    Ok(entries)
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
