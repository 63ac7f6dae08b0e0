//! CLI module for the `layerconf` inspector
//!
//! This module provides:
//! - Argument parsing with clap
//! - Source path validation
//! - Command execution against a [`SourceRegistry`](crate::SourceRegistry)

pub mod executor;
pub mod parser;
pub mod validation;

pub use executor::{build_registry, execute_command};
pub use parser::{Cli, Commands};

use std::path::PathBuf;

use crate::logger::LoggerConfig;
use crate::populate::Populator;
use crate::source::SourceRegistry;

/// Logger configuration for a CLI run
///
/// `LOG_LEVEL`, `LOG_COLORED` and `LOG_FORMAT` are read from the
/// environment (unless `--no-env`), then the global flags override them.
pub fn logger_config(cli: &Cli) -> anyhow::Result<LoggerConfig> {
    let mut config = LoggerConfig::default();

    if !cli.no_env {
        let environment = SourceRegistry::builder()
            .files(Vec::<PathBuf>::new())
            .build();
        Populator::new(&environment).populate(&mut config)?;
    }

    if let Some(level) = cli.log_level() {
        config = config.with_level(level);
    }
    if let Some(format) = cli.log_format {
        config = config.with_format(format);
    }

    config.validate()?;
    Ok(config)
}
