//! Batch driver: discover files, fan them out over a bounded worker pool,
//! tally the outcomes.
//!
//! Discovery completes before any work is dispatched. Each file runs on a
//! blocking thread (decode, mask and encode are all synchronous), and the
//! number of files in flight is capped by a semaphore sized to the
//! configured worker count. Outcomes are handed to a caller callback as
//! they complete, in no particular order.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::config::Config;
use crate::error::{ConfigError, PipelineError, Result};
use crate::types::{BatchSummary, Outcome};

use super::discovery::{DiscoveredFile, FileDiscovery};
use super::processor::FileProcessor;

/// Runs background removal over every eligible file under an input root.
pub struct BatchDriver {
    config: Arc<Config>,
    input_root: PathBuf,
    output_dir: PathBuf,
}

impl BatchDriver {
    /// Create a driver. The config is frozen from here on.
    pub fn new(
        config: Config,
        input_root: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            input_root: input_root.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check the input root and list eligible files under it.
    ///
    /// Files already inside the output directory are left out, so rerunning
    /// with the output nested under the input does not reprocess results.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::InputNotFound`] when the root is missing or
    /// is not a directory.
    pub fn discover(&self) -> Result<Vec<DiscoveredFile>> {
        if !self.input_root.is_dir() {
            return Err(ConfigError::InputNotFound(self.input_root.clone()).into());
        }
        let discovery =
            FileDiscovery::new(self.config.processing.clone()).excluding(&self.output_dir);
        Ok(discovery.discover(&self.input_root))
    }

    /// Discover and process everything, returning only the tally.
    pub async fn run(&self) -> Result<BatchSummary> {
        let files = self.discover()?;
        self.process(files, |_| {}).await
    }

    /// Process already-discovered files.
    ///
    /// `on_outcome` is called once per file as soon as it finishes. Per-file
    /// failures are counted, never returned; the only error is failing to
    /// create the output root.
    pub async fn process<F>(
        &self,
        files: Vec<DiscoveredFile>,
        on_outcome: F,
    ) -> Result<BatchSummary>
    where
        F: Fn(&Outcome) + Send + Sync + 'static,
    {
        std::fs::create_dir_all(&self.output_dir)?;

        if files.is_empty() {
            tracing::debug!("No eligible files under {:?}", self.input_root);
            return Ok(BatchSummary::default());
        }

        let workers = self.config.processing.workers.max(1);
        tracing::debug!(
            "Dispatching {} file(s) across {} worker(s)",
            files.len(),
            workers
        );

        let processor = Arc::new(FileProcessor::new(
            Arc::clone(&self.config),
            &self.input_root,
            &self.output_dir,
        ));
        let semaphore = Arc::new(Semaphore::new(workers));
        let on_outcome = Arc::new(on_outcome);
        let mut handles = Vec::with_capacity(files.len());

        for file in files {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::warn!("Worker semaphore closed unexpectedly — stopping dispatch");
                    break;
                }
            };

            let processor = Arc::clone(&processor);
            let on_outcome = Arc::clone(&on_outcome);
            let path = file.path;

            let handle = tokio::spawn(async move {
                let task_path = path.clone();
                let joined =
                    tokio::task::spawn_blocking(move || processor.process(&task_path)).await;
                drop(permit); // Release the worker slot before the callback
                let outcome = joined.unwrap_or_else(|e| worker_failure(&path, &e));
                on_outcome(&outcome);
                outcome
            });
            handles.push(handle);
        }

        let mut summary = BatchSummary::default();
        for handle in handles {
            match handle.await {
                Ok(outcome) => summary.record(&outcome),
                Err(e) => {
                    tracing::error!("Batch task panicked: {e}");
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}

/// Turn a panicked or cancelled worker into an error outcome for its file.
fn worker_failure(path: &Path, err: &tokio::task::JoinError) -> Outcome {
    let message = if err.is_panic() {
        "worker panicked".to_string()
    } else {
        err.to_string()
    };
    let error = PipelineError::Worker {
        path: path.to_path_buf(),
        message,
    };
    Outcome::Error {
        source: path.to_path_buf(),
        message: error.to_string(),
    }
}
