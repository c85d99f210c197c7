//! Persisting a finished canvas to disk.
//!
//! Output is written atomically: the encoder streams into a sibling
//! temporary file which is renamed into place only after the encode
//! succeeded, so a failed run never leaves a partial image behind.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use crate::error::{VoidrainError, VoidrainResult};
use crate::framebuffer::Framebuffer;

/// Sink for finished canvases. Injectable so tests can capture output
/// without touching the filesystem.
pub trait AssetWriter {
    fn write(&self, fb: &Framebuffer, path: &Path) -> VoidrainResult<()>;
}

pub fn ensure_parent_dir(path: &Path) -> VoidrainResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory '{}'", parent.display())
            })?;
        }
    }
    Ok(())
}

/// PNG writer using best compression and adaptive filtering.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngWriter;

impl PngWriter {
    fn tmp_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }

    fn encode(&self, fb: &Framebuffer, tmp: &Path) -> VoidrainResult<()> {
        let file = File::create(tmp).map_err(|e| {
            VoidrainError::io(format!("failed to create '{}': {e}", tmp.display()))
        })?;
        let encoder = PngEncoder::new_with_quality(
            BufWriter::new(file),
            CompressionType::Best,
            FilterType::Adaptive,
        );
        encoder
            .write_image(fb.data(), fb.width(), fb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| VoidrainError::io(format!("png encode failed: {e}")))?;
        Ok(())
    }
}

impl AssetWriter for PngWriter {
    fn write(&self, fb: &Framebuffer, path: &Path) -> VoidrainResult<()> {
        ensure_parent_dir(path)?;
        let tmp = Self::tmp_path(path);

        if let Err(e) = self.encode(fb, &tmp) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }

        std::fs::rename(&tmp, path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            VoidrainError::io(format!(
                "failed to move '{}' into place at '{}': {e}",
                tmp.display(),
                path.display()
            ))
        })?;
        Ok(())
    }
}
