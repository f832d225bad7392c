//! Configuration management for Blackout.
//!
//! Configuration is loaded from the platform config directory with defaults
//! for every field, then overridden by command-line flags. Once a batch
//! starts the config is frozen and shared read-only with every worker.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Blackout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Background mask settings
    pub mask: MaskConfig,

    /// Batch processing settings
    pub processing: ProcessingConfig,

    /// Output writing settings
    pub pipeline: PipelineConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(expand_path(path))?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.blackout.blackout/config.toml
    /// - Linux: ~/.config/blackout/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\blackout\config\config.toml
    ///
    /// Falls back to ~/.blackout/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "blackout", "blackout")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".blackout").join("config.toml")
            })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.mask.threshold, 20);
        assert_eq!(config.mask.feather, 3);
        assert_eq!(config.mask.dilate, 1);
        assert!(config.processing.workers >= 1);
        assert!(!config.processing.keep_structure);
    }

    #[test]
    fn test_default_formats() {
        let config = ProcessingConfig::default();
        assert_eq!(
            config.supported_formats,
            vec!["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"]
        );
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[mask]"));
        assert!(toml.contains("[processing]"));
        assert!(toml.contains("threshold = 20"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("[mask]\nthreshold = 40\n").unwrap();
        assert_eq!(config.mask.threshold, 40);
        assert_eq!(config.mask.feather, 3);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[processing]\nworkers = 2\nkeep_structure = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.processing.workers, 2);
        assert!(config.processing.keep_structure);
    }

    #[test]
    fn test_load_from_rejects_out_of_range_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[mask]\nthreshold = 300\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_feather_enabled_only_for_odd_sizes() {
        let mut mask = MaskConfig::default();
        assert!(mask.feather_enabled());
        mask.feather = 4;
        assert!(!mask.feather_enabled());
        mask.feather = 0;
        assert!(!mask.feather_enabled());
        mask.feather = 1;
        assert!(mask.feather_enabled());
    }
}
