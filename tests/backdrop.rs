use voidrain::{
    Face, FontCatalog, FontProvider, FontRole, Framebuffer, PipelineConfig, PngWriter, render,
    render_to_file,
};

fn small_cfg(seed: u64) -> PipelineConfig {
    PipelineConfig {
        width: 640,
        height: 360,
        seed,
        noise_samples: 20_000,
        ..PipelineConfig::default()
    }
}

#[test]
fn same_seed_renders_identical_bytes() {
    let cfg = small_cfg(1234);
    let fonts = FontCatalog::builtin();
    let a = render(&cfg, &fonts).unwrap();
    let b = render(&cfg, &fonts).unwrap();
    assert_eq!(a.data(), b.data());
}

#[test]
fn different_seeds_render_different_bytes() {
    let fonts = FontCatalog::builtin();
    let a = render(&small_cfg(1), &fonts).unwrap();
    let b = render(&small_cfg(2), &fonts).unwrap();
    assert_ne!(a.data(), b.data());
}

#[test]
fn output_matches_requested_dimensions() {
    let cfg = PipelineConfig {
        width: 512,
        height: 288,
        noise_samples: 10_000,
        ..PipelineConfig::default()
    };
    let fonts = FontCatalog::builtin();
    let fb = render(&cfg, &fonts).unwrap();
    assert_eq!(fb.width(), 512);
    assert_eq!(fb.height(), 288);
    assert_eq!(fb.data().len(), 512 * 288 * 3);
}

#[test]
fn default_render_keeps_the_top_left_corner_dark() {
    let cfg = PipelineConfig::default();
    let fonts = FontCatalog::builtin();
    let fb = render(&cfg, &fonts).unwrap();
    let px = fb.get(0, 0).unwrap();
    assert!(
        px.r < 20 && px.g < 20 && px.b < 20,
        "corner pixel too bright: {px:?}"
    );
}

#[test]
fn watermark_changes_the_canvas_center() {
    use voidrain::stages::{StageCtx, base, watermark};

    let cfg = small_cfg(42);
    let fonts = FontCatalog::builtin();
    let ctx = StageCtx {
        cfg: &cfg,
        fonts: &fonts,
    };
    let mut fb = Framebuffer::new(cfg.width, cfg.height).unwrap();
    base::apply(&mut fb, &ctx).unwrap();
    let before = fb.clone();
    watermark::apply(&mut fb, &ctx).unwrap();

    let cx = (cfg.width / 2) as i32;
    let cy = (cfg.height / 2) as i32;
    let mut changed = 0;
    for dy in -40..40 {
        for dx in -200..200 {
            if fb.get(cx + dx, cy + dy) != before.get(cx + dx, cy + dy) {
                changed += 1;
            }
        }
    }
    assert!(changed > 0, "watermark left the center region untouched");
}

struct FailingProvider;

impl FontProvider for FailingProvider {
    fn resolve(&self, role: FontRole, _size: u32) -> voidrain::VoidrainResult<Face> {
        Err(voidrain::VoidrainError::font(format!(
            "no face available for {role:?}"
        )))
    }
}

#[test]
fn failing_font_provider_still_produces_a_complete_image() {
    let cfg = small_cfg(99);
    let fonts = FontCatalog::with_provider(Box::new(FailingProvider));
    let fb = render(&cfg, &fonts).unwrap();
    assert_eq!(fb.data().len(), 640 * 360 * 3);
    // The watermark still lands via the fallback face.
    assert!(fb.data().iter().any(|&c| c > 0));
}

#[test]
fn render_to_file_writes_a_decodable_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backdrop.png");
    let cfg = small_cfg(7);
    let fonts = FontCatalog::builtin();
    render_to_file(&cfg, &fonts, &PngWriter, &path).unwrap();

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (640, 360));
}

#[test]
fn failed_write_leaves_no_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    // A path whose parent is a regular file cannot be created.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"x").unwrap();
    let path = blocker.join("backdrop.png");

    let cfg = small_cfg(7);
    let fonts = FontCatalog::builtin();
    let err = render_to_file(&cfg, &fonts, &PngWriter, &path);
    assert!(err.is_err());
    assert!(!path.exists());
}
