//! Environment override source

use std::collections::HashMap;

/// Read access to environment variables
///
/// Injected into the registry so resolution never has to touch
/// process-wide state in tests.
pub trait EnvProvider: Send + Sync {
    /// Value of `key`, or `None` when unset
    fn var(&self, key: &str) -> Option<String>;
}

/// The environment of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvProvider for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvProvider for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Environment variable name for a textual path
///
/// Spaces become underscores; everything else is kept as written.
pub fn variable_name(path: &str) -> String {
    path.replace(' ', "_")
}
