//! Fragment loading strategies.

use super::ConfigMap;
use crate::error::LoadError;
use serde_json::Value;
use std::path::Path;

/// Resolves a file path to a fragment.
pub trait FragmentLoader {
    /// Whether `path` is something this loader understands. Files that are not
    /// accepted are visited but not merged.
    fn accepts(&self, _path: &Path) -> bool {
        true
    }

    fn load(&self, path: &Path) -> Result<ConfigMap, LoadError>;
}

/// Serialization formats understood by [`FileFragmentLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentFormat {
    Yaml,
    Json,
}

impl FragmentFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(FragmentFormat::Yaml),
            "json" => Some(FragmentFormat::Json),
            _ => None,
        }
    }
}

/// Loads YAML and JSON fragments from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFragmentLoader;

impl FileFragmentLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse already-read content in the given format.
    pub fn parse(
        &self,
        path: &Path,
        content: &str,
        format: FragmentFormat,
    ) -> Result<ConfigMap, LoadError> {
        let value = match format {
            FragmentFormat::Yaml => {
                if is_blank_yaml(content) {
                    return Ok(ConfigMap::new());
                }
                parse_yaml(content).map_err(|source| LoadError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            FragmentFormat::Json => {
                serde_json::from_str::<Value>(content).map_err(|source| LoadError::Json {
                    path: path.to_path_buf(),
                    source,
                })?
            }
        };

        match value {
            Value::Object(map) => Ok(map),
            // `~` or an explicit null document.
            Value::Null if format == FragmentFormat::Yaml => Ok(ConfigMap::new()),
            other => Err(LoadError::NotAMapping {
                path: path.to_path_buf(),
                found: value_kind(&other),
            }),
        }
    }
}

impl FragmentLoader for FileFragmentLoader {
    fn accepts(&self, path: &Path) -> bool {
        FragmentFormat::from_path(path).is_some()
    }

    fn load(&self, path: &Path) -> Result<ConfigMap, LoadError> {
        let format = FragmentFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(path, &content, format)
    }
}

/// Parse YAML, resolving `<<` merge keys before converting to JSON values.
fn parse_yaml(content: &str) -> Result<Value, serde_yaml::Error> {
    let mut value: serde_yaml::Value = serde_yaml::from_str(content)?;
    value.apply_merge()?;
    serde_yaml::from_value(value)
}

/// Blank or comment-only YAML.
fn is_blank_yaml(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}

/// Human-readable name of a value's type.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
