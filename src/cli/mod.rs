//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trendwatch")]
#[command(author, version, about = "Moving-average, drawdown and return alerts by email")]
pub struct Cli {
    /// Configuration file path [default: config/default.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level, overrides logging.level from the config file
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check tickers and send notifications
    Run(RunArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Tickers to check, in order
    #[arg(default_value = "SPY")]
    pub tickers: Vec<String>,

    /// Moving average window in trading days [default: alerts.default_window]
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,

    /// Save the run reports as JSON
    #[arg(long)]
    pub save: Option<PathBuf>,
}
