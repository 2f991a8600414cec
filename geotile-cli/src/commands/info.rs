//! `geotile info`: load a tile directory and summarize the resulting index.

use crate::config::Config;
use crate::commands::render::resolve_tiles_dir;
use crate::error::CliResult;
use crate::tile_dir::{load_tiles, scan_tile_dir};
use geotile_core::{StoreStats, TileStore};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct InfoReport {
    pub files: usize,
    pub stored: StoreStats,
    pub tiles_per_scale: BTreeMap<u8, usize>,
}

pub fn collect(tiles: Option<&Path>, config: &Config) -> CliResult<InfoReport> {
    let dir = resolve_tiles_dir(tiles, config)?;
    let files = scan_tile_dir(&dir, &config.tiles.extension, None)?;

    let mut store = TileStore::new();
    let mut tiles_per_scale = BTreeMap::new();
    for tile in load_tiles(&files) {
        let scale = tile.scale.get();
        if store.add_tile(tile) {
            *tiles_per_scale.entry(scale).or_insert(0) += 1;
        }
    }

    Ok(InfoReport {
        files: files.len(),
        stored: store.stats(),
        tiles_per_scale,
    })
}

pub fn run(tiles: Option<&Path>, config: &Config, json: bool) -> CliResult<()> {
    let report = collect(tiles, config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("files scanned: {}", report.files);
        println!(
            "tiles stored:  {} ({} index nodes, depth {})",
            report.stored.tiles, report.stored.nodes, report.stored.depth
        );
        for (scale, count) in &report.tiles_per_scale {
            println!("  scale {:>2}: {}", scale, count);
        }
    }
    Ok(())
}
