//! Resize stage: produce fixed-width variants of a downloaded image.
//!
//! Each task is decoded once, then resized to every configured width
//! with Lanczos3 resampling, preserving the source aspect ratio. The
//! source file is removed after processing whether or not every variant
//! succeeded; a worker never revisits a task.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::error::{PipelineError, PipelineResult};
use crate::metrics::Metrics;
use crate::types::ImageTask;

/// Produces aspect-preserving variants at a fixed set of widths.
#[derive(Debug, Clone)]
pub struct Resizer {
    widths: Vec<u32>,
}

impl Resizer {
    /// Create a resizer for the given target widths (processed in order).
    pub fn new(widths: Vec<u32>) -> Self {
        Self { widths }
    }

    /// The configured target widths.
    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    /// Process one task end to end; returns the number of variants written.
    ///
    /// Decode failure skips every width; a persist failure skips only its
    /// width. Either way the source file is deleted afterwards and the
    /// failure is logged, so a bad image can never wedge a worker.
    pub fn process(
        &self,
        incoming: &Path,
        outgoing: &Path,
        task: &ImageTask,
        metrics: &Metrics,
    ) -> usize {
        let source = incoming.join(&task.filename);
        let mut written = 0;

        match decode(&source) {
            Ok(image) => {
                let (orig_w, orig_h) = image.dimensions();
                for &width in &self.widths {
                    let dest = outgoing.join(variant_filename(&task.filename, width));
                    match write_variant(&image, orig_w, orig_h, width, &dest) {
                        Ok(size) => {
                            metrics.produced.add(size);
                            written += 1;
                        }
                        Err(e) => tracing::warn!("{e}"),
                    }
                }
                tracing::debug!(
                    "Resized {} ({orig_w}x{orig_h}) into {written} variant(s)",
                    task.filename
                );
            }
            Err(e) => tracing::warn!("{e}"),
        }

        if let Err(e) = std::fs::remove_file(&source) {
            tracing::warn!("Failed to remove source {}: {e}", source.display());
        }
        written
    }
}

/// Decode an image file, detecting the format from its content.
fn decode(path: &Path) -> PipelineResult<DynamicImage> {
    let decode_err = |message: String| PipelineError::Decode {
        path: path.to_path_buf(),
        message,
    };

    image::ImageReader::open(path)
        .map_err(|e| decode_err(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| decode_err(e.to_string()))?
        .decode()
        .map_err(|e| decode_err(e.to_string()))
}

/// Resize to `width` and persist, returning the written file's size.
fn write_variant(
    image: &DynamicImage,
    orig_w: u32,
    orig_h: u32,
    width: u32,
    dest: &Path,
) -> PipelineResult<u64> {
    let persist_err = |message: String| PipelineError::Persist {
        path: dest.to_path_buf(),
        message,
    };

    let height = aspect_height(orig_w, orig_h, width);
    let resized = image.resize_exact(width, height, FilterType::Lanczos3);
    resized.save(dest).map_err(|e| persist_err(e.to_string()))?;

    let size = std::fs::metadata(dest)
        .map_err(|e| persist_err(e.to_string()))?
        .len();
    Ok(size)
}

/// Height for `target_w` that preserves the source aspect ratio.
pub fn aspect_height(orig_w: u32, orig_h: u32, target_w: u32) -> u32 {
    let scaled = (orig_h as f64) * (target_w as f64) / (orig_w as f64);
    (scaled.round() as u32).max(1)
}

/// Output name for one variant: `<stem>_<width><ext>`.
pub fn variant_filename(filename: &str, width: u32) -> String {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => format!("{}_{}{}", &filename[..idx], width, &filename[idx..]),
        _ => format!("{filename}_{width}"),
    }
}
