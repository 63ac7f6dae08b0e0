//! CLI argument validation functions

use std::path::{Path, PathBuf};

use crate::source::Format;

/// Validate that a source path has a supported suffix
///
/// The file does not need to exist: missing sources are skipped at load
/// time, and `check` reports a missing sole source.
pub fn validate_source_path(path_str: &str) -> Result<PathBuf, String> {
    if path_str.trim().is_empty() {
        return Err("Source path cannot be empty".to_string());
    }

    let path = PathBuf::from(path_str);
    Format::from_path(Path::new(path_str)).map_err(|e| e.to_string())?;
    Ok(path)
}
