//! The `blackout run` command.

mod batch;

use blackout_core::config::expand_path;
use blackout_core::pipeline::FileDiscovery;
use blackout_core::{BatchDriver, BlackoutError, Config, ConfigError};
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;

use batch::process_batch;

/// How a run ended, mapped onto the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every discovered file was attempted (per-file failures included)
    Completed,
    /// The input folder does not exist
    BadInput,
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Completed => ExitCode::SUCCESS,
            RunStatus::BadInput => ExitCode::from(2),
        }
    }
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input folder to scan for images
    #[arg(short, long, default_value = ".")]
    pub input: PathBuf,

    /// Output folder
    #[arg(short, long, default_value = "./output")]
    pub output: PathBuf,

    /// Black threshold 0-255; higher = more aggressive [config default: 20]
    #[arg(short, long)]
    pub threshold: Option<u8>,

    /// Odd kernel size for Gaussian blur on alpha; 0 disables [config default: 3]
    #[arg(long)]
    pub feather: Option<u32>,

    /// Dilate iterations on background mask to avoid dark halos [config default: 1]
    #[arg(long)]
    pub dilate: Option<u32>,

    /// Parallel workers [config default: CPU count]
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub workers: Option<u64>,

    /// Mirror input subfolder structure in output
    #[arg(long)]
    pub keep_structure: bool,

    /// Print the final summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            output: PathBuf::from("./output"),
            threshold: None,
            feather: None,
            dilate: None,
            workers: None,
            keep_structure: false,
            json: false,
        }
    }
}

/// Fold command-line overrides into the loaded config.
pub fn apply_overrides(mut config: Config, args: &RunArgs) -> Result<Config, ConfigError> {
    if let Some(threshold) = args.threshold {
        config.mask.threshold = threshold;
    }
    if let Some(feather) = args.feather {
        config.mask.feather = feather;
    }
    if let Some(dilate) = args.dilate {
        config.mask.dilate = dilate;
    }
    if let Some(workers) = args.workers {
        config.processing.workers = workers as usize;
    }
    if args.keep_structure {
        config.processing.keep_structure = true;
    }
    config.validate()?;
    Ok(config)
}

/// Execute the run command.
pub async fn execute(args: RunArgs, config: Config) -> anyhow::Result<ExitCode> {
    run(args, config).await.map(ExitCode::from)
}

async fn run(args: RunArgs, config: Config) -> anyhow::Result<RunStatus> {
    let config = apply_overrides(config, &args)?;
    let input = expand_path(&args.input);
    let output = expand_path(&args.output);
    let driver = BatchDriver::new(config, &input, &output);

    let mask = driver.config().mask;
    if mask.feather > 0 && !mask.feather_enabled() {
        tracing::warn!("Feather size {} is even; feathering is disabled", mask.feather);
    }

    let files = match driver.discover() {
        Ok(files) => files,
        Err(BlackoutError::Config(e @ ConfigError::InputNotFound(_))) => {
            tracing::error!("{e}");
            return Ok(RunStatus::BadInput);
        }
        Err(e) => return Err(e.into()),
    };

    if files.is_empty() {
        // Still create the output folder so callers can rely on it existing.
        std::fs::create_dir_all(&output)?;
        tracing::info!("No images found in the input folder.");
        return Ok(RunStatus::Completed);
    }
    tracing::info!(
        "Found {} image(s) to process ({:.1} MB)",
        files.len(),
        FileDiscovery::total_size(&files) as f64 / 1_048_576.0
    );

    process_batch(&driver, files, args.json).await?;
    Ok(RunStatus::Completed)
}
