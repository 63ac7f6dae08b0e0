//! Error types for configuration resolution and population

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors surfaced by the registry and the population engine.
///
/// Scalar conversion failures never appear here: malformed optional values
/// degrade to the field type's zero value instead.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// `populate` was handed a struct by value instead of `&mut`
    #[error("please supply a mutable reference to populate(), i.e. populate(&mut my_config)")]
    NotAPointer,

    /// A required field resolved to nothing (or to zero for numeric fields)
    #[error("missing required value: {path}")]
    MissingRequiredValue {
        /// Dotted path of the offending field
        path: String,
    },

    /// The source file suffix is not one of the known formats
    #[error(
        "could not determine file format of '{}'; use files ending with .yml, .yaml, .json or .toml",
        .path.display()
    )]
    UnsupportedSourceFormat { path: PathBuf },

    /// The source file could not be read
    #[error("could not read from source file '{}'", .path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The source file was read but its contents did not decode
    #[error("failed to decode {format} source '{}': {message}", .path.display())]
    Decode {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Create a missing required value error from a dotted path
    pub fn missing<S: Into<String>>(path: S) -> Self {
        ConfigError::MissingRequiredValue { path: path.into() }
    }

    /// Create a read failure for the given source file
    pub fn source_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::SourceRead {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Create a decode failure for the given source file
    pub fn decode(path: impl Into<PathBuf>, format: &'static str, message: impl ToString) -> Self {
        ConfigError::Decode {
            path: path.into(),
            format,
            message: message.to_string(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ConfigError>;
