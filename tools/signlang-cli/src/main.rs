//! Signlang CLI - replay recorded gestures and drive live sessions.
//!
//! Usage:
//!   signlang replay <PATH>     Replay recorded recognition results
//!   signlang run <PATH>        Interactive session over recorded results
//!   signlang config            Show (or initialize) the configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use signlang_common::config::AppConfig;

mod commands;
mod console;

#[derive(Parser)]
#[command(
    name = "signlang",
    about = "Turn a stream of hand gestures into words",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the standard location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSONL file of recognition results through the stream loop
    Replay {
        /// Path to the recorded results (one JSON object per line)
        path: PathBuf,

        /// Override the symbol acceptance threshold
        #[arg(long)]
        threshold: Option<f32>,
    },

    /// Run an interactive session that loops over recorded results
    Run {
        /// Path to the recorded results (one JSON object per line)
        path: PathBuf,

        /// Override the refresh rate (Hz)
        #[arg(long)]
        fps: Option<u32>,
    },

    /// Print the effective configuration
    Config {
        /// Write the default configuration to the standard location
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    signlang_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Replay { path, threshold } => commands::replay::run(config, path, threshold),
        Commands::Run { path, fps } => commands::run::run(config, path, fps).await,
        Commands::Config { init } => commands::config::run(&config, init),
    }
}
