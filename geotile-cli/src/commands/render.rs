//! `geotile render`: paint one viewport from a tile directory into a PNG.

use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::tile_dir::{load_tiles, scan_tile_dir};
use geotile_core::{GeoPoint, ZoomScale};
use geotile_render::MapView;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct RenderArgs {
    pub tiles: Option<PathBuf>,
    pub out: PathBuf,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub scale: Option<u8>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

pub fn run(args: &RenderArgs, config: &Config) -> CliResult<()> {
    let tiles_dir = resolve_tiles_dir(args.tiles.as_deref(), config)?;
    let center = GeoPoint::try_new(
        args.lon.unwrap_or(config.view.longitude),
        args.lat.unwrap_or(config.view.latitude),
    )?;
    let scale = ZoomScale::clamped(args.scale.unwrap_or(config.view.scale));
    let width = args.width.unwrap_or(config.view.width);
    let height = args.height.unwrap_or(config.view.height);
    if width == 0 || height == 0 {
        return Err(CliError::validation(format!(
            "output size must be positive, got {}x{}",
            width, height
        )));
    }

    let files = scan_tile_dir(&tiles_dir, &config.tiles.extension, Some(scale))?;
    let tiles = load_tiles(&files);
    log::info!(
        "Loaded {} of {} tiles at scale {} from {}",
        tiles.len(),
        files.len(),
        scale,
        tiles_dir.display()
    );

    let mut view = MapView::new(config.render.clone());
    view.set_scale(scale.get());
    view.set_center(center);
    for tile in tiles {
        view.add_tile(tile);
    }

    view.save_png(&args.out, width, height)?;
    log::info!("Wrote {}x{} map to {}", width, height, args.out.display());
    Ok(())
}

pub(crate) fn resolve_tiles_dir(explicit: Option<&Path>, config: &Config) -> CliResult<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| config.tiles.dir.clone())
        .ok_or_else(|| CliError::config("no tile directory given (use --tiles or [tiles] dir)"))
}
