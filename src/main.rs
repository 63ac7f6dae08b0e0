use clap::Parser;

use layerconf::cli::{Cli, execute_command, logger_config};
use layerconf::logger::init_logger;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = logger_config(&cli)?;
    init_logger(&config)?;
    tracing::debug!(version = layerconf::pkg_version(), "Starting layerconf");

    execute_command(&cli, &mut std::io::stdout().lock())
}
