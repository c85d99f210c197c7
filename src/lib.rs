//! voidrain: deterministic glitch-art backdrop renderer.
//!
//! Builds a 1920x1080 "corrupted commerce" backdrop in ten fixed stages:
//! a radial gradient base field with additive noise, a ghosted watermark,
//! scanlines, two matrix-rain passes, zone-placed retail iconography
//! (carts, barcodes, price tags, corner annotations), glitch band
//! displacement, chromatic aberration, a vignette, and a final tone pass.
//! Every stage draws its randomness from a forked stream of one seed, so a
//! given seed and canvas size always reproduce the same bytes.

#![forbid(unsafe_code)]

pub mod color;
pub mod draw;
pub mod error;
pub mod font;
pub mod framebuffer;
pub mod pipeline;
pub mod rng;
pub mod stages;
pub mod writer;

pub use color::{Rgb, Rgba, palette};
pub use error::{VoidrainError, VoidrainResult};
pub use font::{BitmapFace, Face, FontCatalog, FontProvider, FontRole, GlyphRenderer};
pub use framebuffer::{Framebuffer, Layer, Raster};
pub use pipeline::{DEFAULT_HEIGHT, DEFAULT_WIDTH, PipelineConfig, render, render_to_file};
pub use rng::RngStream;
pub use writer::{AssetWriter, PngWriter};
