//! Per-file processing: resolve the output path, decode, mask, write.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{Outcome, SkipReason};

use super::decode::{format_to_string, ImageDecoder};
use super::encode::PngWriter;
use super::mask::PixelMasker;

/// Processes single files into transparent PNGs.
///
/// Every call to [`FileProcessor::process`] yields exactly one [`Outcome`];
/// errors never escape as `Err`.
pub struct FileProcessor {
    config: Arc<Config>,
    input_root: PathBuf,
    output_dir: PathBuf,
    decoder: ImageDecoder,
    masker: PixelMasker,
    writer: PngWriter,
}

impl FileProcessor {
    /// Create a processor for files found under `input_root`.
    pub fn new(config: Arc<Config>, input_root: &Path, output_dir: &Path) -> Self {
        Self {
            decoder: ImageDecoder::new(),
            masker: PixelMasker::new(config.mask),
            writer: PngWriter::new(config.pipeline.clone()),
            input_root: input_root.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            config,
        }
    }

    /// Where the PNG for `input` will be written.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        resolve_output_path(
            input,
            &self.input_root,
            &self.output_dir,
            self.config.processing.keep_structure,
        )
    }

    /// Process one file and report what happened.
    pub fn process(&self, input: &Path) -> Outcome {
        let start = std::time::Instant::now();
        tracing::debug!("Processing: {:?}", input);

        let output = self.output_path(input);
        match self.run(input, &output) {
            Ok(()) => {
                tracing::debug!("Wrote {:?} in {:?}", output, start.elapsed());
                Outcome::Success {
                    source: input.to_path_buf(),
                    output,
                }
            }
            Err(e) if e.is_unreadable() => {
                tracing::debug!("Skipping {:?}: {}", input, e);
                Outcome::Skipped {
                    source: input.to_path_buf(),
                    reason: SkipReason::Unreadable,
                }
            }
            Err(e) => Outcome::Error {
                source: input.to_path_buf(),
                message: e.to_string(),
            },
        }
    }

    fn run(&self, input: &Path, output: &Path) -> PipelineResult<()> {
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::CreateDir {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }

        let decoded = self.decoder.decode(input)?;
        tracing::trace!(
            "  Decoded {} {}x{} ({} bytes)",
            format_to_string(decoded.format),
            decoded.width,
            decoded.height,
            decoded.file_size
        );

        let rgba = self.masker.apply(&decoded.image)?;
        self.writer.write(&rgba, output)
    }
}

/// Map an input path to its PNG output path.
///
/// With `keep_structure`, the input's directory relative to `input_root` is
/// mirrored under `output_dir`; otherwise the file lands directly in
/// `output_dir`. The extension is always replaced with `png`.
pub fn resolve_output_path(
    input: &Path,
    input_root: &Path,
    output_dir: &Path,
    keep_structure: bool,
) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    let mut file_name = stem.to_os_string();
    file_name.push(".png");

    let target_dir = if keep_structure {
        input
            .parent()
            .and_then(|dir| dir.strip_prefix(input_root).ok())
            .map(|rel| output_dir.join(rel))
            .unwrap_or_else(|| output_dir.to_path_buf())
    } else {
        output_dir.to_path_buf()
    };

    target_dir.join(file_name)
}
