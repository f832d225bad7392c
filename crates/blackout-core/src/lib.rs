//! Blackout Core - near-black background removal for image folders.
//!
//! Every pixel whose channels are all at or below a threshold is treated as
//! background and made transparent. Results are always written as RGBA PNG.
//!
//! # Architecture
//!
//! ```text
//! Folder → Discover → (per file, in parallel) Decode → Mask → Encode PNG → Outcome
//!                                                                          ↓
//!                                                                   BatchSummary
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use blackout_core::{BatchDriver, Config};
//!
//! #[tokio::main]
//! async fn main() -> blackout_core::Result<()> {
//!     let config = Config::load()?;
//!     let driver = BatchDriver::new(config, "./frames", "./output");
//!     let summary = driver.run().await?;
//!     println!("Summary: {summary}.");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::{Config, MaskConfig};
pub use error::{BlackoutError, ConfigError, PipelineError, PipelineResult, Result};
pub use pipeline::{
    remove_background, BatchDriver, DiscoveredFile, FileProcessor, PixelMasker,
};
pub use types::{BatchSummary, Outcome, SkipReason};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
