//! Loading of JSON (or YAML) configuration documents into a JSON object

use serde_json::{Map, Value};
use std::path::Path;

use crate::error::ConfigError;

/// Read a config file that must hold a top-level object.
///
/// `.yaml` / `.yml` files are parsed as YAML, everything else as JSON. Both land in
/// the same `serde_json` value model so validation is format-independent.
pub fn load_object(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let value = if is_yaml(path) {
        serde_yaml::from_str::<Value>(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_json::from_str::<Value>(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}
