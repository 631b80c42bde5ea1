//! Cinescope CLI - Command-line interface
//!
//! Browse, search and inspect movies from the terminal.

mod commands;

use std::path::PathBuf;

use cinescope_core::tracing_setup::{CliLogLevel, init_tracing};
use clap::Parser;

#[derive(Parser)]
#[command(name = "cinescope")]
#[command(about = "Browse movie metadata from the terminal")]
struct Cli {
    /// Console log level (the log file always captures everything)
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn, global = true)]
    log_level: CliLogLevel,

    /// Directory for the per-run debug log
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())?;

    commands::handle_command(cli.command).await
}
