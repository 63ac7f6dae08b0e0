//! Source registry and path resolver
//!
//! Values are resolved from three layers, highest priority first:
//! 1. Command-line overrides (`--Name Bob`)
//! 2. Environment variables (`Name=Bob`)
//! 3. Structured files, merged in load order so the last file defining a
//!    path wins
//!
//! Files are read lazily, exactly once, on the first lookup.

pub mod args;
pub mod env;
pub mod file;

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::path::{ConfigPath, Segment};

pub use args::CommandLine;
pub use env::{EnvProvider, ProcessEnv};
pub use file::{FileReader, Format, FsReader};

/// Files consulted by [`SourceRegistry::new`], in load order
pub const DEFAULT_SOURCES: &[&str] = &[
    "build/config.yml",
    "build/config.json",
    "config/config.yml",
    "config/config.json",
    "config.yml",
    "config.json",
    "env.yml",
    "env.json",
    "config.local.yml",
    "config.local.json",
    "env.local.yml",
    "env.local.json",
];

/// Anything that can resolve a path to its textual value
///
/// Absence is the empty string; there is no separate "not found" signal.
pub trait Resolve {
    fn get(&self, path: &ConfigPath) -> String;
}

impl Resolve for std::collections::HashMap<String, String> {
    fn get(&self, path: &ConfigPath) -> String {
        std::collections::HashMap::get(self, &path.to_string())
            .cloned()
            .unwrap_or_default()
    }
}

impl<R: Resolve + ?Sized> Resolve for &R {
    fn get(&self, path: &ConfigPath) -> String {
        (**self).get(path)
    }
}

/// A decoded source file
#[derive(Debug, Clone)]
pub struct Document {
    pub origin: PathBuf,
    pub root: Value,
}

/// Outcome of the one-time load
#[derive(Debug, Default)]
struct Loaded {
    documents: Vec<Document>,
    failure: Option<ConfigError>,
}

/// Ordered collection of configuration sources
pub struct SourceRegistry {
    files: Vec<PathBuf>,
    command_line: Option<CommandLine>,
    environment: Option<Arc<dyn EnvProvider>>,
    reader: Arc<dyn FileReader>,
    loaded: OnceLock<Loaded>,
}

impl SourceRegistry {
    /// Registry over the process arguments, the process environment and
    /// [`DEFAULT_SOURCES`]
    pub fn new() -> Self {
        Self::builder()
            .command_line(CommandLine::from_process())
            .build()
    }

    pub fn builder() -> SourceRegistryBuilder {
        SourceRegistryBuilder::default()
    }

    /// Replace every source with the single file at `path`
    ///
    /// Command-line and environment overrides are switched off and the file
    /// is loaded afresh on the next lookup.
    pub fn source(&mut self, path: impl Into<PathBuf>) {
        self.files = vec![path.into()];
        self.command_line = None;
        self.environment = None;
        self.loaded = OnceLock::new();
    }

    /// Load the file layer now instead of on first lookup
    ///
    /// Failures of individual files are tolerated when several files are
    /// configured. With a single configured file its failure is returned
    /// here; lookups then see an empty file layer.
    pub fn load(&self) -> Result<()> {
        match &self.loaded().failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Documents that loaded successfully, in load order
    pub fn documents(&self) -> &[Document] {
        &self.loaded().documents
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Resolve `path` to its textual value, or `""` when no source has it
    pub fn get(&self, path: impl Into<ConfigPath>) -> String {
        self.resolve(&path.into())
    }

    fn resolve(&self, path: &ConfigPath) -> String {
        let key = path.to_string();

        if let Some(value) = self.command_line.as_ref().and_then(|cli| cli.get(&key)) {
            tracing::trace!(path = %key, source = "command-line", "Resolved value");
            return value.to_string();
        }

        if let Some(provider) = &self.environment {
            if let Some(value) = provider.var(&env::variable_name(&key)).filter(|v| !v.is_empty()) {
                tracing::trace!(path = %key, source = "environment", "Resolved value");
                return value;
            }
        }

        let mut found = None;
        for document in self.documents() {
            if let Some(value) = lookup(&document.root, path.segments()) {
                found = Some((value, &document.origin));
            }
        }

        match found {
            Some((value, origin)) => {
                tracing::trace!(path = %key, source = %origin.display(), "Resolved value");
                render(value)
            }
            None => String::new(),
        }
    }

    fn loaded(&self) -> &Loaded {
        self.loaded.get_or_init(|| self.load_files())
    }

    fn load_files(&self) -> Loaded {
        let mut loaded = Loaded::default();
        let sole = self.files.len() == 1;

        for path in &self.files {
            match file::load(self.reader.as_ref(), path) {
                Ok(root) => {
                    tracing::debug!(file = %path.display(), "Loaded configuration source");
                    loaded.documents.push(Document {
                        origin: path.clone(),
                        root,
                    });
                }
                Err(err) => {
                    log_skipped(path, &err);
                    if sole {
                        loaded.failure = Some(err);
                    }
                }
            }
        }

        loaded
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolve for SourceRegistry {
    fn get(&self, path: &ConfigPath) -> String {
        self.resolve(path)
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("files", &self.files)
            .field("command_line", &self.command_line)
            .field("environment", &self.environment.is_some())
            .field("loaded", &self.loaded.get().is_some())
            .finish()
    }
}

/// Builder for [`SourceRegistry`] with injectable collaborators
pub struct SourceRegistryBuilder {
    files: Vec<PathBuf>,
    command_line: Option<CommandLine>,
    environment: Option<Arc<dyn EnvProvider>>,
    reader: Arc<dyn FileReader>,
}

impl Default for SourceRegistryBuilder {
    fn default() -> Self {
        Self {
            files: DEFAULT_SOURCES.iter().map(PathBuf::from).collect(),
            command_line: None,
            environment: Some(Arc::new(ProcessEnv)),
            reader: Arc::new(FsReader),
        }
    }
}

impl SourceRegistryBuilder {
    /// Replace the file list; files are merged in the given order
    pub fn files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn command_line(mut self, command_line: CommandLine) -> Self {
        self.command_line = Some(command_line);
        self
    }

    pub fn without_command_line(mut self) -> Self {
        self.command_line = None;
        self
    }

    pub fn environment(mut self, environment: impl EnvProvider + 'static) -> Self {
        self.environment = Some(Arc::new(environment));
        self
    }

    pub fn without_environment(mut self) -> Self {
        self.environment = None;
        self
    }

    pub fn file_reader(mut self, reader: impl FileReader + 'static) -> Self {
        self.reader = Arc::new(reader);
        self
    }

    /// Build the registry; nothing is read until the first lookup
    pub fn build(self) -> SourceRegistry {
        SourceRegistry {
            files: self.files,
            command_line: self.command_line,
            environment: self.environment,
            reader: self.reader,
            loaded: OnceLock::new(),
        }
    }
}

fn log_skipped(path: &Path, err: &ConfigError) {
    match err {
        ConfigError::SourceRead { .. } => {
            tracing::debug!(file = %path.display(), "Configuration source not readable, skipping")
        }
        _ => tracing::warn!(file = %path.display(), error = %err, "Skipping configuration source"),
    }
}

/// Walk `segments` through a decoded tree
///
/// The first segment indexes the root mapping. Each following segment
/// indexes a mapping by key or a sequence by position; a sequence always
/// wins the index interpretation. At a mapping, consecutive segments may
/// also be joined back with [`ConfigPath::SEPARATOR`] to match a key that
/// itself contains it, so `inner_api_key` finds `inner: {api_key: ..}`.
/// The shortest matching key that leads to a value wins. Any mismatch
/// yields `None`, as does a `null` leaf.
pub fn lookup<'a>(root: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    if segments.is_empty() {
        return None;
    }
    descend(root, segments)
}

fn descend<'a>(node: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    let Some(first) = segments.first() else {
        return (!node.is_null()).then_some(node);
    };

    match node {
        Value::Array(items) => descend(items.get(first.as_index()?)?, &segments[1..]),
        Value::Object(map) => {
            let mut key = String::new();
            for (taken, segment) in segments.iter().enumerate() {
                if taken > 0 {
                    key.push(ConfigPath::SEPARATOR);
                }
                key.push_str(&segment.as_text());
                if let Some(found) = map.get(&key).and_then(|child| descend(child, &segments[taken + 1..])) {
                    return Some(found);
                }
            }
            None
        }
        _ => None,
    }
}

/// Textual form of a resolved node
///
/// Composite nodes are serialised as compact JSON with the enclosing
/// bracket or brace removed, so `["a","b"]` renders as `"a","b"`.
pub fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => {
            let json = value.to_string();
            json[1..json.len() - 1].to_string()
        }
    }
}
