//! Per-file outcomes and the batch tally built from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Why a discovered file was filtered out instead of processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The file could not be decoded as an image
    Unreadable,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unreadable => write!(f, "unreadable"),
        }
    }
}

/// The terminal result of processing one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// A transparent PNG was written to `output`
    Success { source: PathBuf, output: PathBuf },

    /// The input was not an image we could read
    Skipped { source: PathBuf, reason: SkipReason },

    /// Decoding succeeded but masking or writing failed
    Error { source: PathBuf, message: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success { output, .. } => write!(f, "OK: {}", output.display()),
            Outcome::Skipped { source, reason } => {
                write!(f, "SKIP ({}): {}", reason, source.display())
            }
            Outcome::Error { source, message } => {
                write!(f, "ERROR ({}): {}", source.display(), message)
            }
        }
    }
}

/// Aggregate counts for a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub succeeded: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl BatchSummary {
    /// Count one outcome.
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Success { .. } => self.succeeded += 1,
            Outcome::Error { .. } => self.failed += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
        }
    }

    /// Total number of files accounted for.
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed + self.skipped
    }
}

impl<'a> FromIterator<&'a Outcome> for BatchSummary {
    fn from_iter<I: IntoIterator<Item = &'a Outcome>>(iter: I) -> Self {
        let mut summary = Self::default();
        for outcome in iter {
            summary.record(outcome);
        }
        summary
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} OK, {} errors, {} skipped",
            self.succeeded, self.failed, self.skipped
        )
    }
}
