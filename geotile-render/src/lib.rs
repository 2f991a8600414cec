/*!
# GeoTile Rendering

Composites the tiles held in a [`geotile_core::TileStore`] into a raster
surface for a viewport (center, zoom scale, pixel size).

## Architecture

1. **Viewport**: geographic view rectangle and tile-to-pixel mapping
2. **Compositor**: queries the store, keeps tiles at the viewport scale and
   blits them at their projected offsets
3. **Render cache**: the last composite is reused until a tile insertion,
   scale change, center change or resize marks it dirty
*/

pub mod cache;
pub mod compositor;
pub mod config;
pub mod map_view;
pub mod shared;
pub mod viewport;

pub use cache::RenderCache;
pub use compositor::{compose, visible_tiles};
pub use config::{PaintOrder, RenderConfig};
pub use map_view::{MapView, RenderStats, DEFAULT_CENTER, DEFAULT_SCALE};
pub use shared::SharedMapView;
pub use viewport::Viewport;
