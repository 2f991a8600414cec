//! Error types for geotile

use thiserror::Error;

/// Errors raised by the checked constructors and by raster export.
///
/// Tile insertion, querying and painting never fail: invalid tiles are
/// ignored and scales are clamped instead.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("Invalid coordinate: longitude {longitude}, latitude {latitude}")]
    InvalidCoordinate { longitude: f64, latitude: f64 },

    #[error("Grid position ({column}, {row}) is outside the grid at scale {scale}")]
    GridOutOfBounds { column: i32, row: i32, scale: u8 },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Input/Output error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;
