//! Trend alert CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use trendwatch_config::load_config;
use trendwatch_monitor::setup_logging;

const DEFAULT_CONFIG: &str = "config/default.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicit --config must exist; the default file is optional
    let (config_path, required) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG), false),
    };
    let config = load_config(&config_path, required)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    // Setup logging
    let log_level = match cli.log_level {
        Some(cli::LogLevel::Trace) => "trace",
        Some(cli::LogLevel::Debug) => "debug",
        Some(cli::LogLevel::Info) => "info",
        Some(cli::LogLevel::Warn) => "warn",
        Some(cli::LogLevel::Error) => "error",
        None => config.logging.level.as_str(),
    };
    let json_logs = cli.json_logs || config.logging.format == "json";
    let _log_guard = setup_logging(log_level, json_logs, config.logging.file.as_deref().map(Path::new));

    // Execute command
    match cli.command {
        Commands::Run(args) => cli::commands::run::run(args, &config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&config_path, &config).await,
    }
}
