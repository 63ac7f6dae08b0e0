//! Command executor for dispatching CLI commands

use std::io::Write;

use anyhow::Context;

use super::parser::{Cli, Commands};
use crate::duration;
use crate::source::{CommandLine, SourceRegistry};

/// Build the registry described by the global flags and `overrides`
pub fn build_registry(cli: &Cli) -> SourceRegistry {
    let mut builder = SourceRegistry::builder().command_line(CommandLine::parse(cli.overrides()));

    if !cli.sources.is_empty() {
        builder = builder.files(cli.sources.iter().cloned());
    }
    if cli.no_env {
        builder = builder.without_environment();
    }

    builder.build()
}

/// Execute a CLI command, writing results to `out`
pub fn execute_command(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Get { paths, .. } => {
            let registry = build_registry(cli);
            for path in paths {
                writeln!(out, "{}={}", path, registry.get(path.as_str()))?;
            }
        }
        Commands::Duration { texts } => {
            for text in texts {
                let parsed = duration::parse(text);
                writeln!(out, "{}: {}s ({:?})", text, parsed.as_secs(), parsed)?;
            }
        }
        Commands::Check { .. } => {
            let registry = build_registry(cli);
            registry
                .load()
                .context("Configuration sources failed to load")?;

            let documents = registry.documents();
            if documents.is_empty() {
                writeln!(out, "No configuration sources found")?;
            }
            for document in documents {
                writeln!(out, "Loaded {}", document.origin.display())?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn run(args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(args)?;
        let mut out = Vec::new();
        execute_command(&cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn setup_config_dir() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("config.yml"),
            "Name: Bob\nHobbies:\n  Sports:\n    First: Skating\n",
        )
        .unwrap();
        temp_dir
    }

    #[test]
    fn test_get_from_source() {
        let dir = setup_config_dir();
        let source = dir.path().join("config.yml");
        let output = run(&[
            "layerconf",
            "--no-env",
            "--source",
            source.to_str().unwrap(),
            "get",
            "Name",
            "Hobbies_Sports_First",
            "Missing",
        ])
        .unwrap();
        assert_eq!(output, "Name=Bob\nHobbies_Sports_First=Skating\nMissing=\n");
    }

    #[test]
    fn test_get_with_override() {
        let dir = setup_config_dir();
        let source = dir.path().join("config.yml");
        let output = run(&[
            "layerconf",
            "--no-env",
            "--source",
            source.to_str().unwrap(),
            "get",
            "Name",
            "--",
            "--Name",
            "Alice",
        ])
        .unwrap();
        assert_eq!(output, "Name=Alice\n");
    }

    #[test]
    fn test_duration_command() {
        let output = run(&["layerconf", "duration", "1h30m", "5xyz"]).unwrap();
        assert_eq!(output, "1h30m: 5400s (5400s)\n5xyz: 0s (0ns)\n");
    }

    #[test]
    fn test_check_reports_documents() {
        let dir = setup_config_dir();
        let source = dir.path().join("config.yml");
        let output = run(&["layerconf", "--source", source.to_str().unwrap(), "check"]).unwrap();
        assert!(output.starts_with("Loaded "));
        assert!(output.trim_end().ends_with("config.yml"));
    }

    #[test]
    fn test_check_fails_for_missing_sole_source() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("absent.yml");
        let err = run(&["layerconf", "--source", source.to_str().unwrap(), "check"]).unwrap_err();
        assert!(err.to_string().contains("failed to load"));
    }
}
