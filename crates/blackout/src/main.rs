//! Blackout CLI - batch-remove near-black backgrounds from images.
//!
//! Every image under the input folder is written to the output folder as a
//! PNG whose near-black background is transparent.
//!
//! # Usage
//!
//! ```bash
//! # Process ./frames into ./output with the defaults (threshold 20, feather 3, dilate 1)
//! blackout run -i ./frames
//!
//! # More aggressive threshold, mirror subfolders, 8 workers
//! blackout run -i ./frames -o ./cutouts -t 40 --keep-structure -w 8
//!
//! # View configuration
//! blackout config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;
mod logging;

/// Blackout - batch-remove near-black backgrounds into transparent PNGs.
#[derive(Parser, Debug)]
#[command(name = "blackout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "BLACKOUT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Remove near-black backgrounds from every image in a folder
    Run(cli::run::RunArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    // An explicitly requested config file must load; the default one may not.
    let config = match cli::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.config.is_some() => return Err(e.into()),
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `blackout config path`."
            );
            blackout_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Blackout v{}", blackout_core::VERSION);

    match cli.command {
        Commands::Run(args) => cli::run::execute(args, config).await,
        Commands::Config(args) => {
            cli::config::execute(args, cli.config.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
