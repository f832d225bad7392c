//! Error types for the Blackout background-removal pipeline.
//!
//! Configuration errors are fatal to a batch. Pipeline errors describe a
//! single file and are folded into that file's `Outcome` by the processor.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Blackout operations.
#[derive(Error, Debug)]
pub enum BlackoutError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// The batch input root is missing or is not a directory
    #[error("Input folder does not exist: {}", .0.display())]
    InputNotFound(PathBuf),
}

/// Per-file pipeline errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The image has no pixels
    #[error("Empty image provided")]
    EmptyImage,

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Neither content sniffing nor the extension identified a format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// PNG encoding or the final write failed
    #[error("Write failed for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// The output directory could not be created
    #[error("Cannot create directory {path}: {message}")]
    CreateDir { path: PathBuf, message: String },

    /// The worker running this file died before producing a result
    #[error("Worker failed for {path}: {message}")]
    Worker { path: PathBuf, message: String },
}

impl PipelineError {
    /// True for errors that mean "this input is not an image we can read".
    ///
    /// The processor reports these as skips rather than failures.
    pub fn is_unreadable(&self) -> bool {
        matches!(
            self,
            PipelineError::Decode { .. } | PipelineError::UnsupportedFormat { .. }
        )
    }
}

/// Convenience type alias for Blackout results.
pub type Result<T> = std::result::Result<T, BlackoutError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_errors_are_unreadable() {
        let err = PipelineError::Decode {
            path: PathBuf::from("a.jpg"),
            message: "bad header".into(),
        };
        assert!(err.is_unreadable());

        let err = PipelineError::UnsupportedFormat {
            path: PathBuf::from("a.tif"),
            format: "tif".into(),
        };
        assert!(err.is_unreadable());
    }

    #[test]
    fn test_write_errors_are_not_unreadable() {
        let err = PipelineError::Encode {
            path: PathBuf::from("out/a.png"),
            message: "disk full".into(),
        };
        assert!(!err.is_unreadable());
        assert!(!PipelineError::EmptyImage.is_unreadable());
    }

    #[test]
    fn test_input_not_found_message() {
        let err = ConfigError::InputNotFound(PathBuf::from("/nope"));
        assert_eq!(err.to_string(), "Input folder does not exist: /nope");
    }
}
