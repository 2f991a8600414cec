//! Web-Mercator (slippy map) projection between geographic coordinates and
//! tile grid cells.
//!
//! Latitudes at or beyond +/-90 degrees are singular here; callers keep
//! points strictly inside (-90, 90).

use crate::types::{GeoPoint, GeoRect, GridPosition, ZoomScale, TILE_SIZE};
use std::f64::consts::PI;

/// Largest latitude reachable by the grid (top edge of row 0).
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

pub fn grid_position_from_geo(point: GeoPoint, scale: ZoomScale) -> GridPosition {
    let n = scale.grid_size() as f64;
    let lat_rad = point.latitude.to_radians();

    let column = (point.longitude + 180.0) / 360.0 * n;
    let row = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;

    GridPosition::new(column.floor() as i32, row.floor() as i32)
}

/// North-west corner of the cell at `pos`.
pub fn geo_from_grid_position(pos: GridPosition, scale: ZoomScale) -> GeoPoint {
    let n = scale.grid_size() as f64;
    let m = PI - 2.0 * PI * pos.y as f64 / n;

    let longitude = pos.x as f64 / n * 360.0 - 180.0;
    let latitude = m.sinh().atan().to_degrees();

    GeoPoint::new(longitude, latitude)
}

/// Geographic rectangle covered by one grid cell: origin at the cell's
/// north-west corner, size always non-negative.
pub fn footprint(pos: GridPosition, scale: ZoomScale) -> GeoRect {
    let current = geo_from_grid_position(pos, scale);
    let next = geo_from_grid_position(pos.offset(1, 1), scale);

    GeoRect::new(
        current.longitude,
        current.latitude,
        (current.longitude - next.longitude).abs(),
        (current.latitude - next.latitude).abs(),
    )
}

/// Degrees per pixel along each axis for the cell at `pos`, assuming the
/// nominal 256 pixel tile.
pub fn tile_scale_factor(pos: GridPosition, scale: ZoomScale) -> (f64, f64) {
    let size = footprint(pos, scale);
    (size.width / TILE_SIZE as f64, size.height / TILE_SIZE as f64)
}
