//! Host-facing map surface: tile ingestion, viewport control and cached
//! painting.

use crate::cache::RenderCache;
use crate::compositor::compose;
use crate::config::RenderConfig;
use crate::viewport::Viewport;
use geotile_core::{BoxedSink, GeoPoint, MapError, MapEvent, Tile, TileStore, ZoomScale};
use image::{imageops, RgbaImage};
use serde::Serialize;
use std::path::Path;

/// Paris, the initial center of a new view.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(2.34880, 48.85341);
pub const DEFAULT_SCALE: u8 = 7;

/// Counters for cache behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    pub regenerations: u64,
    pub cache_hits: u64,
}

pub struct MapView {
    store: TileStore,
    cache: RenderCache,
    center: GeoPoint,
    scale: ZoomScale,
    size: (u32, u32),
    config: RenderConfig,
    sink: Option<BoxedSink>,
    stats: RenderStats,
}

impl Default for MapView {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl std::fmt::Debug for MapView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapView")
            .field("store", &self.store)
            .field("dirty", &self.cache.is_dirty())
            .field("center", &self.center)
            .field("scale", &self.scale)
            .field("size", &self.size)
            .field("stats", &self.stats)
            .finish()
    }
}

impl MapView {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            store: TileStore::new(),
            cache: RenderCache::new(),
            center: DEFAULT_CENTER,
            scale: ZoomScale::clamped(DEFAULT_SCALE),
            size: (0, 0),
            config,
            sink: None,
            stats: RenderStats::default(),
        }
    }

    /// View that reports scale, center and display changes to `sink`.
    pub fn with_sink(config: RenderConfig, sink: BoxedSink) -> Self {
        Self {
            sink: Some(sink),
            ..Self::new(config)
        }
    }

    pub fn store(&self) -> &TileStore {
        &self.store
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn is_dirty(&self) -> bool {
        self.cache.is_dirty()
    }

    pub fn scale(&self) -> ZoomScale {
        self.scale
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Last known surface size in pixels
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.center, self.scale, self.size.0, self.size.1)
    }

    /// Store a decoded tile. Empty tiles are ignored and change nothing.
    pub fn add_tile(&mut self, tile: Tile) -> bool {
        let added = self.store.add_tile(tile);
        if added {
            self.display_changed();
        }
        added
    }

    /// Set the zoom scale, clamped to [1, 18].
    pub fn set_scale(&mut self, scale: u8) {
        let scale = ZoomScale::clamped(scale);
        if scale == self.scale {
            return;
        }
        log::debug!("scale {} -> {}", self.scale, scale);
        self.scale = scale;
        self.emit(MapEvent::ScaleChanged(scale));
        self.display_changed();
    }

    pub fn set_center(&mut self, center: GeoPoint) {
        if center == self.center {
            return;
        }
        log::debug!(
            "center ({}, {}) -> ({}, {})",
            self.center.longitude,
            self.center.latitude,
            center.longitude,
            center.latitude
        );
        self.center = center;
        self.emit(MapEvent::CenterChanged(center));
        self.display_changed();
    }

    /// Record a new surface size. A different size invalidates the cache.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == self.size {
            return;
        }
        self.size = (width, height);
        self.display_changed();
    }

    /// Composite for a `width` x `height` target, regenerated only when stale.
    ///
    /// A target without area leaves everything untouched and returns the
    /// previous surface, if one exists.
    pub fn paint(&mut self, width: u32, height: u32) -> Option<&RgbaImage> {
        let viewport = Viewport::new(self.center, self.scale, width, height);
        if !viewport.is_renderable() {
            return self.cache.surface();
        }
        self.resize(width, height);

        let store = &self.store;
        let config = &self.config;
        if self.cache.regenerate_if_dirty(|| compose(store, &viewport, config)) {
            self.stats.regenerations += 1;
        } else {
            self.stats.cache_hits += 1;
        }
        self.cache.surface()
    }

    /// Paint into a caller-owned surface, sized from the target itself.
    /// Returns false when nothing was drawn.
    pub fn paint_into(&mut self, target: &mut RgbaImage) -> bool {
        let (width, height) = target.dimensions();
        match self.paint(width, height) {
            Some(surface) => {
                imageops::replace(target, surface, 0, 0);
                true
            }
            None => false,
        }
    }

    /// Paint and write the composite as a PNG file.
    pub fn save_png(&mut self, path: &Path, width: u32, height: u32) -> Result<(), MapError> {
        match self.paint(width, height) {
            Some(surface) => {
                surface.save_with_format(path, image::ImageFormat::Png)?;
                log::debug!("wrote {}x{} composite to {}", width, height, path.display());
                Ok(())
            }
            None => Err(MapError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("cannot export a {}x{} surface", width, height),
            ))),
        }
    }

    fn display_changed(&mut self) {
        self.cache.invalidate();
        self.emit(MapEvent::DisplayChanged);
    }

    fn emit(&self, event: MapEvent) {
        if let Some(sink) = &self.sink {
            sink.notify(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotile_core::{grid_position_from_geo, GridPosition};
    use image::Rgba;
    use std::sync::mpsc;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn tile(scale: u8, x: i32, y: i32, shade: u8) -> Tile {
        Tile::new(
            ZoomScale::clamped(scale),
            GridPosition::new(x, y),
            RgbaImage::from_pixel(256, 256, Rgba([shade, 0, 0, 255])),
        )
    }

    #[test]
    fn test_initial_state() {
        let view = MapView::default();
        assert_eq!(view.center(), DEFAULT_CENTER);
        assert_eq!(view.scale().get(), 7);
        assert!(view.is_dirty());
        assert_eq!(view.size(), (0, 0));
    }

    #[test]
    fn test_paint_is_idempotent() {
        let mut view = MapView::default();
        view.add_tile(tile(7, 64, 44, 200));

        let first = view.paint(800, 600).cloned().unwrap();
        let second = view.paint(800, 600).cloned().unwrap();
        assert_eq!(first.as_raw(), second.as_raw());
        assert_eq!(view.stats(), RenderStats { regenerations: 1, cache_hits: 1 });
    }

    #[test]
    fn test_mutations_force_regeneration() {
        let mut view = MapView::default();
        view.paint(800, 600);
        assert_eq!(view.stats().regenerations, 1);

        view.add_tile(tile(7, 64, 44, 200));
        assert!(view.is_dirty());
        let with_tile = view.paint(800, 600).cloned().unwrap();
        assert_eq!(view.stats().regenerations, 2);
        assert_eq!(*with_tile.get_pixel(400, 300), Rgba([200, 0, 0, 255]));

        view.set_scale(8);
        let zoomed = view.paint(800, 600).cloned().unwrap();
        assert_eq!(view.stats().regenerations, 3);
        assert_eq!(*zoomed.get_pixel(400, 300), WHITE);

        view.set_scale(7);
        view.set_center(GeoPoint::new(2.5, 48.9));
        view.paint(800, 600);
        assert_eq!(view.stats().regenerations, 4);
    }

    #[test]
    fn test_paris_tile_centered() {
        let mut view = MapView::default();
        let center_cell = grid_position_from_geo(DEFAULT_CENTER, view.scale());
        view.add_tile(tile(7, center_cell.x, center_cell.y, 120));

        let surface = view.paint(800, 600).unwrap();
        assert_eq!(*surface.get_pixel(400, 300), Rgba([120, 0, 0, 255]));
        assert_eq!(*surface.get_pixel(185, 300), WHITE);
        assert_eq!(*surface.get_pixel(186, 290), Rgba([120, 0, 0, 255]));
    }

    #[test]
    fn test_scale_mismatch_leaves_blank() {
        let mut view = MapView::default();
        view.add_tile(tile(5, 16, 11, 90));
        view.set_scale(6);
        let surface = view.paint(640, 480).unwrap();
        assert!(surface.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_scale_clamping() {
        let mut view = MapView::default();
        view.set_scale(0);
        assert_eq!(view.scale().get(), 1);
        view.set_scale(255);
        assert_eq!(view.scale().get(), 18);
    }

    #[test]
    fn test_unchanged_setters_do_not_invalidate() {
        let (tx, rx) = mpsc::channel();
        let mut view = MapView::with_sink(RenderConfig::default(), Box::new(tx));
        view.paint(100, 100);
        while rx.try_recv().is_ok() {}

        view.set_scale(7);
        view.set_center(DEFAULT_CENTER);
        view.resize(100, 100);
        assert!(!view.is_dirty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_events_emitted() {
        let (tx, rx) = mpsc::channel();
        let mut view = MapView::with_sink(RenderConfig::default(), Box::new(tx));

        view.set_scale(9);
        view.set_center(GeoPoint::new(10.0, 20.0));
        view.add_tile(tile(9, 1, 1, 1));
        let empty = RgbaImage::new(0, 0);
        view.add_tile(Tile::new(ZoomScale::clamped(9), GridPosition::new(2, 2), empty));

        let events: Vec<MapEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                MapEvent::ScaleChanged(ZoomScale::clamped(9)),
                MapEvent::DisplayChanged,
                MapEvent::CenterChanged(GeoPoint::new(10.0, 20.0)),
                MapEvent::DisplayChanged,
                MapEvent::DisplayChanged,
            ]
        );
    }

    #[test]
    fn test_degenerate_paint_is_noop() {
        let mut view = MapView::default();
        assert!(view.paint(0, 600).is_none());
        assert_eq!(view.stats().regenerations, 0);

        let first = view.paint(300, 200).cloned().unwrap();
        let again = view.paint(300, 0).cloned().unwrap();
        assert_eq!(first.as_raw(), again.as_raw());
        assert_eq!(view.size(), (300, 200));
        assert_eq!(view.stats().regenerations, 1);
    }

    #[test]
    fn test_viewport_follows_state() {
        let mut view = MapView::default();
        view.set_scale(9);
        view.paint(640, 480);

        let viewport = view.viewport();
        assert_eq!(viewport.center, DEFAULT_CENTER);
        assert_eq!(viewport.scale.get(), 9);
        assert_eq!((viewport.width, viewport.height), (640, 480));
        assert!(viewport.is_renderable());
        assert!(!MapView::default().viewport().is_renderable());
    }

    #[test]
    fn test_resize_regenerates_at_new_size() {
        let mut view = MapView::default();
        view.paint(300, 200);
        let surface = view.paint(500, 400).unwrap();
        assert_eq!(surface.dimensions(), (500, 400));
        assert_eq!(view.stats().regenerations, 2);
    }

    #[test]
    fn test_paint_into_target() {
        let mut view = MapView::default();
        view.add_tile(tile(7, 64, 44, 33));
        let mut target = RgbaImage::new(800, 600);
        assert!(view.paint_into(&mut target));
        assert_eq!(*target.get_pixel(400, 300), Rgba([33, 0, 0, 255]));

        let mut empty = RgbaImage::new(0, 0);
        let mut fresh = MapView::default();
        assert!(!fresh.paint_into(&mut empty));
    }
}
