//! Background-removal pipeline components.
//!
//! - **mask**: Near-black background mask and alpha computation (pure)
//! - **decode**: Load and decode input images
//! - **encode**: Atomic PNG output
//! - **discovery**: Find eligible image files under a root
//! - **processor**: One file in, one outcome out
//! - **batch**: Bounded worker pool over a whole folder

pub mod batch;
pub mod decode;
pub mod discovery;
pub mod encode;
pub mod mask;
pub mod processor;

// Re-exports for convenient access
pub use batch::BatchDriver;
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use encode::PngWriter;
pub use mask::{remove_background, PixelMasker};
pub use processor::{resolve_output_path, FileProcessor};
