//! layerconf
//!
//! Layered configuration for Rust programs. Values are resolved from
//! command-line overrides, environment variables and YAML/JSON/TOML files,
//! then converted into strongly typed structs through
//! `#[derive(Configurable)]`.

extern crate self as layerconf;

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod duration;
pub mod error;
pub mod logger;
pub mod path;
pub mod populate;
pub mod source;

pub use config::Config;
pub use error::{ConfigError, Result};
pub use path::{ConfigPath, Segment};
pub use populate::{
    ConfigValue, Configurable, Destination, FieldDescriptor, FieldKind, FieldType, Populator,
    StructValue, TimeKind,
};
pub use source::{CommandLine, EnvProvider, FileReader, Resolve, SourceRegistry};

pub use layerconf_macros::Configurable;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
