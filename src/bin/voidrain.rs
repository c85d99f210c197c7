use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context as _;
use clap::Parser;
use voidrain::{FontCatalog, PipelineConfig, PngWriter};

#[derive(Parser, Debug)]
#[command(name = "voidrain", version, about = "Deterministic glitch-art backdrop renderer")]
struct Cli {
    /// Pipeline config JSON; omitted fields use the built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed (overrides the config file).
    #[arg(long)]
    seed: Option<u64>,

    /// Canvas width in pixels (overrides the config file).
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels (overrides the config file).
    #[arg(long)]
    height: Option<u32>,

    /// Output PNG path.
    #[arg(long, default_value = "backdrop.png")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => {
            let f = File::open(path)
                .with_context(|| format!("open config '{}'", path.display()))?;
            serde_json::from_reader(BufReader::new(f))
                .with_context(|| "parse config JSON")?
        }
        None => PipelineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        cfg.seed = seed;
    }
    if let Some(width) = cli.width {
        cfg.width = width;
    }
    if let Some(height) = cli.height {
        cfg.height = height;
    }

    let fonts = FontCatalog::builtin();
    voidrain::render_to_file(&cfg, &fonts, &PngWriter, &cli.out)?;

    eprintln!("wrote {}", cli.out.display());
    Ok(())
}
