use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use terrain_core::render::{normalize, to_grayscale_image, to_terrain_image};
use terrain_core::{DiamondSquare, GeneratorParams, HeightField, RngSource};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, ValueEnum)]
enum ColorMode {
    /// One gray level per height
    #[default]
    Gray,
    /// Water, sand, grass, rock and snow gradient
    Terrain,
}

// Render a diamond-square height map of any size to an image file
#[derive(Parser, Debug)]
#[command(name = "sqdiamond", version)]
#[command(about = "Generate a diamond-square terrain height map and save it as an image")]
struct Args {
    /// Image width in pixels (at least 2)
    width: usize,

    /// Image height in pixels (at least 2)
    height: usize,

    /// Output image path; the format follows the extension (e.g. .png)
    output: PathBuf,

    /// Jitter decay per refinement level, usually in (0, 1) [default: 0.45]
    #[arg(long)]
    roughness: Option<f64>,

    /// Seed for reproducible output; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with generator parameters; flags above override it
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,

    /// Stretch heights to the full 0..1 range before rendering
    #[arg(long)]
    normalize: bool,

    /// How heights are turned into pixels
    #[arg(long, value_enum, default_value_t = ColorMode::Gray)]
    color: ColorMode,
}

impl Args {
    // defaults < params file < explicit flags
    fn resolve_params(&self) -> Result<GeneratorParams> {
        let mut params = match &self.params {
            Some(path) => GeneratorParams::from_json_file(path)
                .with_context(|| format!("loading parameters from {}", path.display()))?,
            None => GeneratorParams::default(),
        };
        if let Some(r) = self.roughness {
            params.roughness = r;
        }
        if self.seed.is_some() {
            params.seed = self.seed;
        }
        Ok(params)
    }
}

fn generate(args: &Args, params: &GeneratorParams) -> Result<HeightField> {
    let generator = DiamondSquare::from_params(args.width, args.height, params);
    let map = match params.seed {
        Some(seed) => generator.generate(&mut RngSource::seeded(seed)),
        None => generator.generate(&mut RngSource::from_entropy()),
    }
    .with_context(|| format!("generating {}x{} terrain", args.width, args.height))?;
    Ok(map)
}

fn save(map: &HeightField, color: ColorMode, path: &Path) -> Result<()> {
    match color {
        ColorMode::Gray => to_grayscale_image(map).save(path),
        ColorMode::Terrain => to_terrain_image(map).save(path),
    }
    .with_context(|| format!("writing image to {}", path.display()))
}

fn run(args: Args) -> Result<()> {
    let params = args.resolve_params()?;
    debug!(
        roughness = params.roughness,
        seed = ?params.seed,
        "resolved generator parameters"
    );

    let start = Instant::now();
    let mut map = generate(&args, &params)?;
    info!(
        width = args.width,
        height = args.height,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "terrain generated"
    );

    if args.normalize {
        normalize(&mut map);
    }
    save(&map, args.color, &args.output)?;
    info!(path = %args.output.display(), color = ?args.color, "image saved");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // clap prints usage and exits with status 2 on missing or malformed arguments
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
