use crate::error::{MapError, Result};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Nominal edge length of a slippy-map tile, in pixels.
pub const TILE_SIZE: u32 = 256;

pub const MIN_SCALE: u8 = 1;
pub const MAX_SCALE: u8 = 18;

/// Longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }

    /// Checked constructor. Longitude must lie in [-180, 180) and latitude
    /// strictly inside (-90, 90), where the projection is defined.
    pub fn try_new(longitude: f64, latitude: f64) -> Result<Self> {
        let lon_ok = (-180.0..180.0).contains(&longitude);
        let lat_ok = latitude > -90.0 && latitude < 90.0;
        if lon_ok && lat_ok {
            Ok(Self::new(longitude, latitude))
        } else {
            Err(MapError::InvalidCoordinate { longitude, latitude })
        }
    }
}

/// Column/row of a cell in the 2^s x 2^s tile grid. Rows grow southward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring position; saturates at the `i32` range.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Returns the position if it addresses a real cell of the grid at `scale`.
    pub fn checked(self, scale: ZoomScale) -> Result<Self> {
        let n = scale.grid_size() as i64;
        let (x, y) = (self.x as i64, self.y as i64);
        if (0..n).contains(&x) && (0..n).contains(&y) {
            Ok(self)
        } else {
            Err(MapError::GridOutOfBounds {
                column: self.x,
                row: self.y,
                scale: scale.get(),
            })
        }
    }
}

/// Integer zoom level, always within [`MIN_SCALE`, `MAX_SCALE`].
///
/// Out of range values are clamped, never rejected, so every `ZoomScale`
/// yields a non-zero grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct ZoomScale(u8);

impl ZoomScale {
    pub const MIN: ZoomScale = ZoomScale(MIN_SCALE);
    pub const MAX: ZoomScale = ZoomScale(MAX_SCALE);

    pub fn clamped(value: u8) -> Self {
        Self(value.clamp(MIN_SCALE, MAX_SCALE))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of cells along one axis of the grid (2^scale).
    pub fn grid_size(self) -> u32 {
        1u32 << self.0
    }
}

impl Default for ZoomScale {
    fn default() -> Self {
        Self::MIN
    }
}

impl From<u8> for ZoomScale {
    fn from(value: u8) -> Self {
        Self::clamped(value)
    }
}

impl From<ZoomScale> for u8 {
    fn from(scale: ZoomScale) -> Self {
        scale.0
    }
}

impl std::fmt::Display for ZoomScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Axis-aligned rectangle in geographic space: origin (`x` longitude, `y`
/// latitude) plus a size. Intersection treats `y` as growing upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl GeoRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// The whole Earth extent indexed by the quadtree.
    pub const fn world() -> Self {
        Self::new(-180.0, -90.0, 360.0, 180.0)
    }

    pub fn from_center(center: GeoPoint, width: f64, height: f64) -> Self {
        Self::new(
            center.longitude - width / 2.0,
            center.latitude - height / 2.0,
            width,
            height,
        )
        .normalized()
    }

    /// Moves the origin so that width and height become non-negative.
    pub fn normalized(self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Closed-interval overlap test; touching edges count as intersecting.
    pub fn intersects(&self, other: &GeoRect) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.top() < other.bottom()
            || self.bottom() > other.top())
    }

    pub fn contains_rect(&self, other: &GeoRect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.bottom() >= self.bottom()
            && other.top() <= self.top()
    }

    /// Overlapping part of both rectangles, if any.
    pub fn intersection(&self, other: &GeoRect) -> Option<GeoRect> {
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let bottom = self.bottom().max(other.bottom());
        let top = self.top().min(other.top());
        if left <= right && bottom <= top {
            Some(GeoRect::new(left, bottom, right - left, top - bottom))
        } else {
            None
        }
    }

    /// Splits the rectangle into four equal quadrants:
    /// south-west, south-east, north-west, north-east.
    pub fn quadrants(&self) -> [GeoRect; 4] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        [
            GeoRect::new(self.x, self.y, hw, hh),
            GeoRect::new(self.x + hw, self.y, hw, hh),
            GeoRect::new(self.x, self.y + hh, hw, hh),
            GeoRect::new(self.x + hw, self.y + hh, hw, hh),
        ]
    }
}

/// A decoded map tile. Identity is `(scale, position)`.
///
/// The pixel buffer is shared, so cloning a tile never copies pixels.
#[derive(Debug, Clone)]
pub struct Tile {
    pub scale: ZoomScale,
    pub position: GridPosition,
    pub image: Arc<RgbaImage>,
}

impl Tile {
    pub fn new(scale: ZoomScale, position: GridPosition, image: RgbaImage) -> Self {
        Self {
            scale,
            position,
            image: Arc::new(image),
        }
    }

    /// Tiles with a zero-area image are never stored.
    pub fn has_pixels(&self) -> bool {
        self.image.width() > 0 && self.image.height() > 0
    }

    pub fn key(&self) -> (ZoomScale, GridPosition) {
        (self.scale, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_scale_clamps() {
        assert_eq!(ZoomScale::clamped(0).get(), 1);
        assert_eq!(ZoomScale::clamped(255).get(), 18);
        assert_eq!(ZoomScale::from(7).get(), 7);
        assert_eq!(ZoomScale::clamped(7).grid_size(), 128);
    }

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::try_new(2.3488, 48.85341).is_ok());
        assert!(GeoPoint::try_new(180.0, 0.0).is_err());
        assert!(GeoPoint::try_new(-180.0, 0.0).is_ok());
        assert!(GeoPoint::try_new(0.0, 90.0).is_err());
        assert!(GeoPoint::try_new(0.0, -90.0).is_err());
    }

    #[test]
    fn test_grid_position_checked() {
        let scale = ZoomScale::clamped(2);
        assert!(GridPosition::new(3, 3).checked(scale).is_ok());
        assert!(GridPosition::new(4, 0).checked(scale).is_err());
        assert!(GridPosition::new(0, -1).checked(scale).is_err());
    }

    #[test]
    fn test_offset_saturates() {
        assert_eq!(GridPosition::new(3, 4).offset(1, -1), GridPosition::new(4, 3));
        assert_eq!(
            GridPosition::new(i32::MAX, i32::MIN).offset(1, -1),
            GridPosition::new(i32::MAX, i32::MIN)
        );
    }

    #[test]
    fn test_rect_normalized() {
        let r = GeoRect::new(10.0, 20.0, -4.0, -6.0).normalized();
        assert_eq!(r, GeoRect::new(6.0, 14.0, 4.0, 6.0));
    }

    #[test]
    fn test_rect_intersection_rules() {
        let a = GeoRect::new(0.0, 0.0, 10.0, 10.0);
        let touching = GeoRect::new(10.0, 0.0, 5.0, 5.0);
        let disjoint = GeoRect::new(10.5, 0.0, 5.0, 5.0);
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&disjoint));
        assert_eq!(a.intersection(&disjoint), None);
        assert_eq!(
            a.intersection(&GeoRect::new(5.0, 5.0, 10.0, 10.0)),
            Some(GeoRect::new(5.0, 5.0, 5.0, 5.0))
        );
    }

    #[test]
    fn test_rect_quadrants_cover_parent() {
        let world = GeoRect::world();
        let quads = world.quadrants();
        assert_eq!(quads[0], GeoRect::new(-180.0, -90.0, 180.0, 90.0));
        assert_eq!(quads[3], GeoRect::new(0.0, 0.0, 180.0, 90.0));
        for q in &quads {
            assert!(world.contains_rect(q));
        }
    }

    #[test]
    fn test_tile_without_pixels() {
        let tile = Tile::new(ZoomScale::MIN, GridPosition::new(0, 0), RgbaImage::new(0, 0));
        assert!(!tile.has_pixels());
        let tile = Tile::new(ZoomScale::MIN, GridPosition::new(0, 0), RgbaImage::new(1, 1));
        assert!(tile.has_pixels());
    }
}
