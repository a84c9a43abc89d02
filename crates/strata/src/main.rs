//! # STRATA
//!
//! Command-line frontend for the terrain generator.
//!
//! ## Usage
//!
//! ```bash
//! strata generate --config world.toml --seed 42 --ascii --png world.png
//! strata noise --config world.toml --field surface --surface-line --png surface.png
//! strata check --config world.toml
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use strata_noise::WorldSeed;
use strata_worldgen::preview::{self, GridStats};
use strata_worldgen::{GenerationParameters, WorldGenerator};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "strata", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a world and report it
    Generate(GenerateArgs),
    /// Render one noise field as a PNG
    Noise(NoiseArgs),
    /// Validate a configuration file without generating
    Check(ConfigArg),
}

#[derive(Args, Debug)]
struct ConfigArg {
    /// Generation parameters (TOML)
    #[arg(short, long)]
    config: PathBuf,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    config: ConfigArg,

    /// Override the configured seed
    #[arg(short, long)]
    seed: Option<i64>,

    /// Print the world as ASCII, top row first
    #[arg(long)]
    ascii: bool,

    /// Write the world as a PNG
    #[arg(long)]
    png: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct NoiseArgs {
    #[command(flatten)]
    config: ConfigArg,

    /// Field to render (defaults to the surface field)
    #[arg(short, long)]
    field: Option<String>,

    /// Sample without the field's amplitude
    #[arg(long)]
    ignore_amplitude: bool,

    /// Draw the world's surface line over the map
    #[arg(long)]
    surface_line: bool,

    /// Output PNG
    #[arg(long)]
    png: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Generate(args) => generate(&args),
        Command::Noise(args) => noise(&args),
        Command::Check(args) => check(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load(config: &ConfigArg) -> Result<GenerationParameters> {
    GenerationParameters::load(&config.config)
        .with_context(|| format!("loading {}", config.config.display()))
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let mut params = load(&args.config)?;
    if let Some(seed) = args.seed {
        params = params.with_seed(WorldSeed::new(seed));
    }

    let start = Instant::now();
    let generator = WorldGenerator::new(params)?;
    let world = generator.generate()?;
    let params = generator.params();

    info!(
        "generated {}x{} world (seed {}) in {:.1?}",
        params.width,
        params.height,
        params.seed.value(),
        start.elapsed()
    );
    info!("{}", GridStats::collect(&world.grid));

    if args.ascii {
        print!("{}", preview::render_ascii(&world.grid, &params.palette));
    }

    if let Some(path) = &args.png {
        render::write_world_png(&world.grid, &params.palette, path)?;
        info!("wrote {}", path.display());
    }

    Ok(())
}

fn noise(args: &NoiseArgs) -> Result<()> {
    let params = load(&args.config)?;
    let name = args.field.as_deref().unwrap_or(&params.surface_noise);
    let field = params.noise.field(name)?;

    let width = usize::try_from(params.width).context("width")?;
    let height = usize::try_from(params.height).context("height")?;
    let map = preview::noise_map(&field, width, height, params.seed, args.ignore_amplitude)?;

    let line = if args.surface_line {
        let offsets = WorldGenerator::new(params.clone())?.surface_profile()?;
        Some(preview::surface_line(&params, &offsets))
    } else {
        None
    };

    render::write_noise_png(&map, line.as_deref(), &args.png)?;
    info!("wrote {} ({}x{}) to {}", name, width, height, args.png.display());
    Ok(())
}

fn check(args: &ConfigArg) -> Result<()> {
    let params = load(args)?;
    info!(
        "{} is valid: {}x{}, {} noise fields, surface field '{}'",
        args.config.display(),
        params.width,
        params.height,
        params.noise.len(),
        params.surface_noise
    );
    Ok(())
}
