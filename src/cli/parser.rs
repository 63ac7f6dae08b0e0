//! CLI argument parsing with clap
//!
//! This module defines the command-line interface of the `layerconf`
//! inspector: global source selection and logging flags plus the `get`,
//! `duration` and `check` subcommands.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::build;
use crate::logger::LogFormat;

/// Inspect layered configuration
#[derive(Parser, Debug)]
#[command(name = "layerconf")]
#[command(about = "Inspect layered configuration")]
#[command(long_about = "
layerconf resolves configuration values the same way the library does:
command-line overrides first, then environment variables, then YAML, JSON
or TOML files where the last file loaded wins.

Overrides are passed after a literal `--` using the `--Name value` grammar.

EXAMPLES:
    # Resolve a nested value from the default source files
    layerconf get Hobbies_Sports_First

    # Read a single file and ignore the environment
    layerconf --source config.yml --no-env get Name Age

    # Override a value on the command line
    layerconf get Name -- --Name Bob

    # Parse durations
    layerconf duration 1h30m \"2 days 1 hour\"

    # Check that the configured sources load
    layerconf --source config.yml check
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration source file
    ///
    /// Replaces the default source list. May be given several times; files
    /// are loaded in order and later files win. Must end in .yml, .yaml,
    /// .json or .toml.
    ///
    /// Example: --source config.yml --source config.local.yml
    #[arg(short, long = "source", value_name = "FILE", global = true, value_parser = super::validation::validate_source_path)]
    pub sources: Vec<PathBuf>,

    /// Ignore environment variables
    #[arg(long, global = true)]
    pub no_env: bool,

    /// Enable verbose logging
    ///
    /// Shows which sources were loaded and where each value came from.
    /// Cannot be used with --quiet.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress everything but errors
    ///
    /// Cannot be used with --verbose.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print resolved values
    ///
    /// Paths use `_` between segments, e.g. `Hobbies_Sports_First` or
    /// `Servers_0_Host`. Absent values print as empty.
    ///
    /// Examples:
    ///   layerconf get Name Age
    ///   layerconf get Name -- --Name Bob
    Get {
        /// Paths to resolve
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<String>,

        /// Command-line overrides, after `--`
        #[arg(last = true, value_name = "OVERRIDES", allow_hyphen_values = true)]
        overrides: Vec<String>,
    },
    /// Parse durations such as `1h30m` or `2 days 1 hour`
    Duration {
        /// Duration texts
        #[arg(required = true, value_name = "TEXT")]
        texts: Vec<String>,
    },
    /// Load the configured sources and report the result
    ///
    /// Exits non-zero when a sole configured source cannot be read or
    /// decoded.
    Check {
        /// Command-line overrides, after `--`
        #[arg(last = true, value_name = "OVERRIDES", allow_hyphen_values = true)]
        overrides: Vec<String>,
    },
}

impl Cli {
    /// Log level selected by --verbose / --quiet, if any
    pub fn log_level(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }

    /// Override arguments given after `--`
    pub fn overrides(&self) -> &[String] {
        match &self.command {
            Commands::Get { overrides, .. } | Commands::Check { overrides } => overrides,
            Commands::Duration { .. } => &[],
        }
    }
}
