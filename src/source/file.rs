//! File-backed structured sources
//!
//! Files are read through a [`FileReader`] and decoded into a generic
//! `serde_json::Value` tree. The decoder is picked from the filename suffix.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{ConfigError, Result};

/// Raw byte access to configuration files
pub trait FileReader: Send + Sync {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

/// Reads from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

impl FileReader for HashMap<PathBuf, Vec<u8>> {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        self.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }
}

/// Structured formats understood by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    /// Detect the format from the filename suffix
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml" | "yaml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            _ => Err(ConfigError::UnsupportedSourceFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
            Format::Toml => "toml",
        }
    }

    /// Decode `bytes` into a string-keyed tree
    ///
    /// The document root must be a mapping; an empty document decodes to an
    /// empty mapping.
    pub fn decode(&self, path: &Path, bytes: &[u8]) -> Result<Value> {
        let root = match self {
            Format::Yaml if bytes.iter().all(u8::is_ascii_whitespace) => Value::Null,
            Format::Yaml => serde_yaml::from_slice::<Value>(bytes)
                .map_err(|e| ConfigError::decode(path, self.as_str(), e))?,
            Format::Json => serde_json::from_slice::<Value>(bytes)
                .map_err(|e| ConfigError::decode(path, self.as_str(), e))?,
            Format::Toml => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| ConfigError::decode(path, self.as_str(), e))?;
                let table: toml::Table = toml::from_str(text)
                    .map_err(|e| ConfigError::decode(path, self.as_str(), e))?;
                Value::Object(toml_table(table))
            }
        };

        match root {
            Value::Object(_) => Ok(root),
            Value::Null => Ok(Value::Object(Map::new())),
            other => Err(ConfigError::decode(
                path,
                self.as_str(),
                format!("expected a mapping at the document root, found {}", kind_name(&other)),
            )),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read and decode one source file
pub fn load(reader: &dyn FileReader, path: &Path) -> Result<Value> {
    let bytes = reader
        .read(path)
        .map_err(|e| ConfigError::source_read(path, e))?;
    Format::from_path(path)?.decode(path, &bytes)
}

fn toml_table(table: toml::Table) -> Map<String, Value> {
    table
        .into_iter()
        .map(|(key, value)| (key, toml_value(value)))
        .collect()
}

fn toml_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_value).collect()),
        toml::Value::Table(table) => Value::Object(toml_table(table)),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_from_suffix() {
        assert_eq!(Format::from_path(Path::new("config.yml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a/b/config.yaml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("config.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("config.toml")).unwrap(), Format::Toml);
    }

    #[test]
    fn test_unknown_or_missing_suffix() {
        for name in ["mysource.unknown", "mysource", "config.YML"] {
            let err = Format::from_path(Path::new(name)).unwrap_err();
            assert!(matches!(err, ConfigError::UnsupportedSourceFormat { .. }), "{name}");
        }
    }

    #[test]
    fn test_decode_yaml() {
        let yaml = b"Name: Bob\nHobbies:\n  Sports:\n    First: Skating\nAge: 41\n";
        let value = Format::Yaml.decode(Path::new("t.yml"), yaml).unwrap();
        assert_eq!(value["Name"], json!("Bob"));
        assert_eq!(value["Hobbies"]["Sports"]["First"], json!("Skating"));
        assert_eq!(value["Age"], json!(41));
    }

    #[test]
    fn test_decode_toml_datetime_as_string() {
        let text = b"title = \"x\"\nstarted = 1979-05-27T07:32:00Z\n[server]\nport = 80\n";
        let value = Format::Toml.decode(Path::new("t.toml"), text).unwrap();
        assert_eq!(value["server"]["port"], json!(80));
        assert_eq!(value["started"], json!("1979-05-27T07:32:00Z"));
    }

    #[test]
    fn test_decode_rejects_scalar_root() {
        let err = Format::Yaml.decode(Path::new("t.yml"), b"--not-valid--").unwrap_err();
        assert!(matches!(err, ConfigError::Decode { format: "yaml", .. }));
        assert!(Format::Json.decode(Path::new("t.json"), b"--not-valid--").is_err());
    }

    #[test]
    fn test_decode_empty_yaml_is_empty_mapping() {
        let value = Format::Yaml.decode(Path::new("t.yml"), b"").unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_load_through_reader() {
        let files = HashMap::from([(PathBuf::from("a.json"), br#"{"x": 1}"#.to_vec())]);
        assert_eq!(load(&files, Path::new("a.json")).unwrap(), json!({"x": 1}));
        assert!(matches!(
            load(&files, Path::new("b.json")),
            Err(ConfigError::SourceRead { .. })
        ));
    }
}
