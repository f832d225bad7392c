//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Extensions accepted by discovery when no override is configured.
pub const DEFAULT_FORMATS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

/// Largest accepted feather kernel size.
pub const MAX_FEATHER: u32 = 255;

/// Accepted values for `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Background mask settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// A pixel is background when every channel is at or below this value
    pub threshold: u8,

    /// Gaussian kernel size applied to the alpha channel; 0 or even disables
    pub feather: u32,

    /// 3x3 dilation passes applied to the background mask
    pub dilate: u32,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            threshold: 20,
            feather: 3,
            dilate: 1,
        }
    }
}

impl MaskConfig {
    /// Whether the configured feather size actually blurs the alpha channel.
    pub fn feather_enabled(&self) -> bool {
        self.feather > 0 && self.feather % 2 == 1
    }
}

/// Batch processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of files processed concurrently
    pub workers: usize,

    /// Mirror input subdirectories under the output directory
    pub keep_structure: bool,

    /// Eligible input extensions (case-insensitive)
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            keep_structure: false,
            supported_formats: DEFAULT_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Detected CPU count, never less than one.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .max(1)
}

/// Output writing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Suffix of the temporary file a PNG is encoded into before the rename
    pub temp_suffix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            temp_suffix: ".part".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
