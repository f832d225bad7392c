//! PNG output with atomic replacement.

use image::codecs::png::PngEncoder;
use image::{ImageEncoder, RgbaImage};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// Writes RGBA images as PNG files.
///
/// The image is encoded into a temporary file next to the destination and
/// renamed into place, so a failed write never leaves a truncated PNG at
/// the output path.
pub struct PngWriter {
    config: PipelineConfig,
}

impl PngWriter {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Encode `image` and atomically move it to `path`.
    ///
    /// The parent directory of `path` must already exist.
    pub fn write(&self, image: &RgbaImage, path: &Path) -> Result<(), PipelineError> {
        let encode_err = |message: String| PipelineError::Encode {
            path: path.to_path_buf(),
            message,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");

        let temp = tempfile::Builder::new()
            .prefix(&format!(".{stem}."))
            .suffix(&self.config.temp_suffix)
            .tempfile_in(dir)
            .map_err(|e| encode_err(format!("Cannot create temporary file: {e}")))?;

        {
            let mut writer = BufWriter::new(temp.as_file());
            encode_png(image, &mut writer).map_err(|e| encode_err(e.to_string()))?;
            writer
                .flush()
                .map_err(|e| encode_err(format!("Flush failed: {e}")))?;
        }

        // Dropping the temp file on any error above deletes it.
        temp.persist(path)
            .map_err(|e| encode_err(format!("Cannot move into place: {}", e.error)))?;
        Ok(())
    }
}

/// Encode `image` as an 8-bit RGBA PNG into `writer`.
pub fn encode_png<W: Write>(image: &RgbaImage, writer: W) -> image::ImageResult<()> {
    PngEncoder::new(writer).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )
}
