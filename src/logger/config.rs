//! Configuration types for the logger

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::populate::{ConfigValue, FieldKind, FieldType};

/// Logger configuration
///
/// Can itself be populated from layered configuration under the
/// `LOG_LEVEL`, `LOG_COLORED` and `LOG_FORMAT` keys.
#[derive(Debug, Clone, Serialize, Deserialize, layerconf_macros::Configurable)]
pub struct LoggerConfig {
    #[config(src = "LOG_LEVEL", default = "info")]
    pub level: String, // Will be converted to tracing::Level
    #[config(src = "LOG_COLORED", default = true)]
    pub colored: bool,
    #[config(src = "LOG_FORMAT", default = "full")]
    pub format: LogFormat,
}

impl LoggerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.parse_level()
            .with_context(|| format!("Invalid log level: {}", self.level))?;
        Ok(())
    }

    /// Parse the log level string into a tracing::Level
    pub fn parse_level(&self) -> Result<Level> {
        match self.level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "Invalid log level '{}'. Valid levels are: trace, debug, info, warn, error",
                self.level
            ),
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            colored: true,
            format: LogFormat::Full,
        }
    }
}

/// Log format options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Invalid log format '{}'. Valid formats are: full, compact, json", s),
        }
    }
}

impl FieldType for LogFormat {
    fn kind() -> FieldKind {
        FieldKind::String
    }

    fn assign(&mut self, value: ConfigValue) {
        if let ConfigValue::String(text) = value {
            match text.parse() {
                Ok(format) => *self = format,
                Err(err) => tracing::warn!(error = %err, "Ignoring log format"),
            }
        }
    }
}
