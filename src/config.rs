//! Configuration façade
//!
//! [`Config`] bundles a [`SourceRegistry`] with the population engine:
//!
//! ```no_run
//! use layerconf::{Config, Configurable};
//!
//! #[derive(Debug, Default, Configurable)]
//! struct Settings {
//!     #[config(default = "8080")]
//!     port: u16,
//!     #[config(required)]
//!     database_url: String,
//! }
//!
//! let config = Config::new();
//! let mut settings = Settings::default();
//! config.populate(&mut settings)?;
//! # Ok::<(), layerconf::ConfigError>(())
//! ```

use std::path::PathBuf;

use crate::error::Result;
use crate::path::ConfigPath;
use crate::populate::{Destination, Populator};
use crate::source::SourceRegistry;

#[derive(Debug, Default)]
pub struct Config {
    registry: SourceRegistry,
}

impl Config {
    /// Configuration over the process arguments, the process environment
    /// and the default source files
    pub fn new() -> Self {
        Self {
            registry: SourceRegistry::new(),
        }
    }

    pub fn with_registry(registry: SourceRegistry) -> Self {
        Self { registry }
    }

    /// Fill `destination` (a `&mut` to a [`Configurable`](crate::Configurable))
    pub fn populate<D: Destination>(&self, destination: D) -> Result<()> {
        Populator::new(&self.registry).populate(destination)
    }

    /// Raw resolved text for `path`, `""` when absent
    ///
    /// Resolves the same way `populate` does: `inner_api_key` reaches both
    /// a field `api_key` inside `inner` and the nested file data for it.
    pub fn get(&self, path: impl Into<ConfigPath>) -> String {
        self.registry.get(path)
    }

    /// Read only from the file at `path` from now on
    pub fn source(&mut self, path: impl Into<PathBuf>) {
        self.registry.source(path);
    }

    pub fn load(&self) -> Result<()> {
        self.registry.load()
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }
}

impl From<SourceRegistry> for Config {
    fn from(registry: SourceRegistry) -> Self {
        Self::with_registry(registry)
    }
}
