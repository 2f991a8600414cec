//! Viewport geometry: the geographic window shown by a surface of a given
//! pixel size, and the mapping from tile corners to pixel offsets.

use geotile_core::{
    geo_from_grid_position, grid_position_from_geo, tile_scale_factor, GeoPoint, GeoRect,
    GridPosition, ZoomScale,
};
use serde::{Deserialize, Serialize};

/// Viewport parameters for one render pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: GeoPoint,
    pub scale: ZoomScale,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(center: GeoPoint, scale: ZoomScale, width: u32, height: u32) -> Self {
        Self { center, scale, width, height }
    }

    /// Nothing can be drawn into a surface without area.
    pub fn is_renderable(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Degrees per pixel derived from the cell under the center.
    pub fn scale_factor(&self) -> (f64, f64) {
        let center_cell = grid_position_from_geo(self.center, self.scale);
        tile_scale_factor(center_cell, self.scale)
    }

    /// Geographic rectangle to query, centered on `center` and enlarged by
    /// `overscan_px` pixels so partially visible edge tiles are included.
    pub fn view_rect(&self, overscan_px: u32) -> GeoRect {
        let (sx, sy) = self.scale_factor();
        let width = (self.width as f64 + overscan_px as f64) * sx;
        let height = (self.height as f64 + overscan_px as f64) * sy;
        GeoRect::from_center(self.center, width, height)
    }

    /// Top-left pixel of the tile at `pos`, relative to the surface origin.
    /// North is up, so latitude differences are inverted.
    pub fn pixel_offset(&self, pos: GridPosition) -> (i32, i32) {
        let (sx, sy) = tile_scale_factor(pos, self.scale);
        let corner = geo_from_grid_position(pos, self.scale);

        let x = (corner.longitude - self.center.longitude) / sx + (self.width / 2) as f64;
        let y = (self.center.latitude - corner.latitude) / sy + (self.height / 2) as f64;
        (x as i32, y as i32)
    }
}
