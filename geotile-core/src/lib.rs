//! GeoTile Core Library
//!
//! Web-Mercator projection, quadtree spatial index and tile store for
//! slippy-map tiles.

pub mod error;
pub mod events;
pub mod projection;
pub mod quadtree;
pub mod store;
pub mod types;

// Re-export commonly used types and functions
pub use error::{MapError, Result};
pub use events::{BoxedSink, EventSink, MapEvent};
pub use projection::{footprint, geo_from_grid_position, grid_position_from_geo, tile_scale_factor};
pub use quadtree::Quadtree;
pub use store::{StoreStats, TileStore};
pub use types::{GeoPoint, GeoRect, GridPosition, Tile, ZoomScale, MAX_SCALE, MIN_SCALE, TILE_SIZE};

/// Version information for the GeoTile core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
