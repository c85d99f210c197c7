//! The ten pixel-processing stages, in their fixed pipeline order.
//!
//! Each stage is a pure `Framebuffer -> Framebuffer` transform (mutating in
//! place) driven by an [`RngStream`] forked from the run seed with a stage
//! constant, so stages can be tested in isolation against fixed canvases and
//! never perturb each other's randomness.

pub mod aberration;
pub mod base;
pub mod glitch;
pub mod icons;
pub mod rain;
pub mod scanline;
pub mod tone;
pub mod vignette;
pub mod watermark;

use crate::error::VoidrainResult;
use crate::font::FontCatalog;
use crate::framebuffer::Framebuffer;
use crate::pipeline::PipelineConfig;
use crate::rng::RngStream;

/// Stable RNG stream indices, one per stochastic stage.
pub(crate) mod streams {
    pub const BASE: u64 = 0x01;
    pub const RAIN_FRONT: u64 = 0x02;
    pub const RAIN_BACK: u64 = 0x03;
    pub const SCANLINE: u64 = 0x04;
    pub const ICONS: u64 = 0x05;
    pub const GLITCH: u64 = 0x06;
    pub const TONE: u64 = 0x07;
}

/// Read-only context handed to every stage.
pub struct StageCtx<'a> {
    pub cfg: &'a PipelineConfig,
    pub fonts: &'a FontCatalog,
}

impl StageCtx<'_> {
    /// Fork the run RNG for a stage (or finer-grained) stream.
    pub fn rng(&self, stream: u64) -> RngStream {
        RngStream::new(self.cfg.seed).fork(stream)
    }
}

/// One named pipeline step.
pub struct Stage {
    pub name: &'static str,
    pub run: fn(&mut Framebuffer, &StageCtx<'_>) -> VoidrainResult<()>,
}

/// The fixed stage order. Load-bearing: glitch displacement must see the
/// fully composited scene, aberration and vignette must run after glitch so
/// the row shuffle cannot undo them, and tone mapping is the final polish.
pub fn pipeline_stages() -> [Stage; 10] {
    [
        Stage {
            name: "base-field",
            run: base::apply,
        },
        Stage {
            name: "watermark",
            run: watermark::apply,
        },
        Stage {
            name: "scanlines",
            run: scanline::apply,
        },
        Stage {
            name: "rain-front",
            run: rain::apply_front,
        },
        Stage {
            name: "rain-back",
            run: rain::apply_back,
        },
        Stage {
            name: "icons",
            run: icons::apply,
        },
        Stage {
            name: "glitch-bands",
            run: glitch::apply,
        },
        Stage {
            name: "chromatic-aberration",
            run: aberration::apply,
        },
        Stage {
            name: "vignette",
            run: vignette::apply,
        },
        Stage {
            name: "tone",
            run: tone::apply,
        },
    ]
}
