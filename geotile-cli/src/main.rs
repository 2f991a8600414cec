use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;
mod tile_dir;

use commands::render::RenderArgs;
use config::Config;
use error::{print_error_and_exit, CliResult};

#[derive(Parser)]
#[command(name = "geotile")]
#[command(about = "GeoTile - slippy-map tile compositor")]
#[command(version)]
#[command(long_about = "
GeoTile indexes decoded map tiles in a quadtree and composites the tiles
visible in a Web-Mercator viewport.

Examples:
  geotile render --tiles ./tiles --out paris.png --scale 7
  geotile locate --lon 2.3488 --lat 48.85341 --scale 7
  geotile info --tiles ./tiles --json
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one viewport from a <scale>/<column>/<row>.png tile tree
    Render {
        /// Tile directory (overrides [tiles] dir)
        #[arg(long)]
        tiles: Option<PathBuf>,

        /// Output PNG file
        #[arg(short, long)]
        out: PathBuf,

        /// Center longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Center latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Zoom scale (clamped to 1..=18)
        #[arg(short, long)]
        scale: Option<u8>,

        /// Image width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Image height in pixels
        #[arg(long)]
        height: Option<u32>,
    },

    /// Show the tile covering a coordinate
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(short, long, default_value = "7")]
        scale: u8,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Load a tile directory and print index statistics
    Info {
        #[arg(long)]
        tiles: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print or write an example configuration file
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Err(err) = dispatch(cli.command, &config) {
        print_error_and_exit(&err);
    }
    Ok(())
}

fn dispatch(command: Commands, config: &Config) -> CliResult<()> {
    match command {
        Commands::Render { tiles, out, lon, lat, scale, width, height } => {
            let args = RenderArgs { tiles, out, lon, lat, scale, width, height };
            commands::render::run(&args, config)
        }
        Commands::Locate { lon, lat, scale, json } => commands::locate::run(lon, lat, scale, json),
        Commands::Info { tiles, json } => commands::info::run(tiles.as_deref(), config, json),
        Commands::Config { output } => cmd_config(output),
    }
}

fn cmd_config(output: Option<PathBuf>) -> CliResult<()> {
    match output {
        Some(path) => {
            Config::default()
                .save_to_file(&path)
                .map_err(|e| error::CliError::config(format!("{:#}", e)))?;
            log::info!("Wrote example configuration to {}", path.display());
        }
        None => {
            let example = Config::example_toml()
                .map_err(|e| error::CliError::config(format!("{:#}", e)))?;
            print!("{}", example);
        }
    }
    Ok(())
}
