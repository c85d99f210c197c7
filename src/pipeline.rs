//! Run configuration and the pipeline orchestrator.
//!
//! The orchestrator walks the fixed stage list produced by
//! [`pipeline_stages`](crate::stages::pipeline_stages), logging one line per
//! stage. Configuration is validated before the first stage runs; any stage
//! error aborts the run, so the only observable artifact is a complete
//! canvas or nothing.

use std::path::Path;

use crate::error::{VoidrainError, VoidrainResult};
use crate::font::FontCatalog;
use crate::framebuffer::Framebuffer;
use crate::stages::icons::{BarcodeZone, CartZone};
use crate::stages::{StageCtx, pipeline_stages};
use crate::writer::AssetWriter;

pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Everything a run needs besides fonts and the writer. Deserializable so a
/// run can be described as a JSON document; every field has the artifact's
/// original value as its default.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub width: u32,
    pub height: u32,
    /// Seeds every RNG stream; identical seed + dimensions reproduce a
    /// byte-identical canvas.
    pub seed: u64,
    /// Total additive-noise samples in the base field.
    pub noise_samples: usize,
    /// Scales glitch band count, height, and shift (0 disables).
    pub glitch_intensity: f32,
    /// Horizontal channel-split distance in pixels.
    pub aberration_offset: i32,
    pub vignette_strength: f32,
    pub contrast: f32,
    pub sharpness: f32,
    /// Inclusive price-tag count range.
    pub price_count: [u32; 2],
    /// Cart zones; `None` uses the canvas-scaled defaults.
    pub cart_zones: Option<Vec<CartZone>>,
    /// Barcode zones; `None` uses the canvas-scaled defaults.
    pub barcode_zones: Option<Vec<BarcodeZone>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: 42,
            noise_samples: 100_000,
            glitch_intensity: 0.85,
            aberration_offset: 2,
            vignette_strength: 0.32,
            contrast: 1.06,
            sharpness: 1.04,
            price_count: [14, 20],
            cart_zones: None,
            barcode_zones: None,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> VoidrainResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(VoidrainError::validation(format!(
                "canvas dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        // The zone tables and glyph layout assume a canvas that can hold
        // the fixed annotations.
        if self.width < 256 || self.height < 256 {
            return Err(VoidrainError::validation(format!(
                "canvas must be at least 256x256, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.glitch_intensity.is_finite() || self.glitch_intensity < 0.0 {
            return Err(VoidrainError::validation(
                "glitch_intensity must be finite and >= 0",
            ));
        }
        if !self.vignette_strength.is_finite() || self.vignette_strength < 0.0 {
            return Err(VoidrainError::validation(
                "vignette_strength must be finite and >= 0",
            ));
        }
        if self.price_count[0] > self.price_count[1] {
            return Err(VoidrainError::validation(
                "price_count range must be lo <= hi",
            ));
        }
        Ok(())
    }
}

/// Run all ten stages and return the finished canvas.
pub fn render(cfg: &PipelineConfig, fonts: &FontCatalog) -> VoidrainResult<Framebuffer> {
    cfg.validate()?;
    let mut fb = Framebuffer::new(cfg.width, cfg.height)?;
    let ctx = StageCtx { cfg, fonts };

    let stages = pipeline_stages();
    let total = stages.len();
    for (i, stage) in stages.iter().enumerate() {
        tracing::info!(stage = stage.name, step = i + 1, total, "running stage");
        (stage.run)(&mut fb, &ctx)?;
    }

    Ok(fb)
}

/// Render and persist in one step. Nothing is written unless every stage
/// succeeded.
pub fn render_to_file(
    cfg: &PipelineConfig,
    fonts: &FontCatalog,
    writer: &dyn AssetWriter,
    path: &Path,
) -> VoidrainResult<()> {
    let fb = render(cfg, fonts)?;
    writer.write(&fb, path)?;
    tracing::info!(path = %path.display(), width = cfg.width, height = cfg.height, "backdrop written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_dimensions_are_rejected_before_any_stage() {
        let cfg = PipelineConfig {
            width: 0,
            ..PipelineConfig::default()
        };
        let fonts = FontCatalog::builtin();
        let err = render(&cfg, &fonts).unwrap_err();
        assert!(err.to_string().contains("validation error"));
    }

    #[test]
    fn inverted_price_range_is_rejected() {
        let cfg = PipelineConfig {
            price_count: [5, 2],
            ..PipelineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = PipelineConfig {
            seed: 7,
            glitch_intensity: 0.5,
            ..PipelineConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, 7);
        assert_eq!(back.glitch_intensity, 0.5);
    }

    #[test]
    fn empty_json_object_yields_defaults() {
        let cfg: PipelineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.width, DEFAULT_WIDTH);
        assert_eq!(cfg.height, DEFAULT_HEIGHT);
        assert_eq!(cfg.seed, 42);
    }
}
