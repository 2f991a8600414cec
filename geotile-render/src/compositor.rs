//! Builds the composite for one viewport from the tiles in a store.

use crate::config::{PaintOrder, RenderConfig};
use crate::viewport::Viewport;
use geotile_core::{Tile, TileStore};
use image::{imageops, RgbaImage};
use std::time::Instant;

/// Tiles at exactly the viewport scale whose footprint meets the view
/// rectangle, in paint order.
pub fn visible_tiles<'a>(
    store: &'a TileStore,
    viewport: &Viewport,
    config: &RenderConfig,
) -> Vec<&'a Tile> {
    let view = viewport.view_rect(config.overscan_px);
    // No fallback to neighbouring zoom levels: wrong-scale tiles leave a gap.
    let mut tiles = store.query_scale(&view, viewport.scale);

    if config.paint_order == PaintOrder::RowMajor {
        tiles.sort_by_key(|t| (t.position.y, t.position.x));
    }

    log::trace!("view {:?}: {} tiles at scale {}", view, tiles.len(), viewport.scale);
    tiles
}

/// Render `viewport` into a fresh surface of the viewport's pixel size.
pub fn compose(store: &TileStore, viewport: &Viewport, config: &RenderConfig) -> RgbaImage {
    let started = Instant::now();
    let mut surface =
        RgbaImage::from_pixel(viewport.width, viewport.height, config.background_rgba());

    let tiles = visible_tiles(store, viewport, config);
    for tile in &tiles {
        let (x, y) = viewport.pixel_offset(tile.position);
        imageops::overlay(&mut surface, tile.image.as_ref(), x as i64, y as i64);
    }

    log::debug!(
        "composited {} tiles into {}x{} at scale {} in {:?}",
        tiles.len(),
        viewport.width,
        viewport.height,
        viewport.scale,
        started.elapsed()
    );
    surface
}
