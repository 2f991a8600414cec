//! Tile store: owns the quadtree and every stored tile.

use crate::events::{BoxedSink, MapEvent};
use crate::projection::footprint;
use crate::quadtree::Quadtree;
use crate::types::{GeoRect, GridPosition, Tile, ZoomScale};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub tiles: usize,
    pub nodes: usize,
    pub depth: u8,
}

pub struct TileStore {
    index: Quadtree<Tile>,
    sink: Option<BoxedSink>,
}

impl Default for TileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileStore")
            .field("tiles", &self.index.len())
            .field("nodes", &self.index.node_count())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl TileStore {
    pub fn new() -> Self {
        Self {
            index: Quadtree::world(),
            sink: None,
        }
    }

    /// Store that reports every successful insertion to `sink`.
    pub fn with_sink(sink: BoxedSink) -> Self {
        Self {
            index: Quadtree::world(),
            sink: Some(sink),
        }
    }

    /// Insert `tile`, replacing any tile already stored at the same footprint.
    ///
    /// Tiles without pixels are ignored. Returns whether the store changed.
    pub fn add_tile(&mut self, tile: Tile) -> bool {
        if !tile.has_pixels() {
            log::debug!(
                "ignoring empty tile at scale {} ({}, {})",
                tile.scale,
                tile.position.x,
                tile.position.y
            );
            return false;
        }

        let rect = footprint(tile.position, tile.scale);
        let replaced = self.index.remove(&rect);
        let (scale, position) = tile.key();
        self.index.insert(rect, tile);

        log::debug!(
            "{} tile at scale {} ({}, {}), {} stored",
            if replaced.is_empty() { "added" } else { "replaced" },
            scale,
            position.x,
            position.y,
            self.index.len()
        );

        if let Some(sink) = &self.sink {
            sink.notify(&MapEvent::TileAdded { scale, position });
        }
        true
    }

    /// Every stored tile whose footprint intersects `rect`, in index order.
    pub fn query(&self, rect: &GeoRect) -> Vec<&Tile> {
        self.index.query(rect).into_iter().map(|e| &e.value).collect()
    }

    /// Like [`TileStore::query`], keeping only tiles at exactly `scale`.
    pub fn query_scale(&self, rect: &GeoRect, scale: ZoomScale) -> Vec<&Tile> {
        self.index
            .query(rect)
            .into_iter()
            .map(|e| &e.value)
            .filter(|t| t.scale == scale)
            .collect()
    }

    pub fn get(&self, scale: ZoomScale, position: GridPosition) -> Option<&Tile> {
        let rect = footprint(position, scale);
        self.index
            .query(&rect)
            .into_iter()
            .find(|e| e.rect == rect && e.value.key() == (scale, position))
            .map(|e| &e.value)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            tiles: self.index.len(),
            nodes: self.index.node_count(),
            depth: self.index.depth(),
        }
    }
}
