//! Command implementations.

pub mod config;
pub mod run;

use blackout_core::{Config, ConfigError};
use std::path::Path;

/// Load the config from `path` if given, otherwise from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
