pub mod analyzer_config;
pub mod cli;

pub use analyzer_config::AnalyzerConfig;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "log-analyzer")]
#[command(about = "Builds a per-URL request time report from the latest nginx access log")]
pub struct CliArgs {
    /// Path to a JSON or TOML config file; its keys override the built-in defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log CPU and memory usage after each phase
    #[arg(long)]
    pub monitor: bool,

    /// Locate the latest log and report what would happen without parsing it
    #[arg(long)]
    pub dry_run: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
