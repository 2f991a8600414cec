//! Loading decoded tiles from a `<scale>/<column>/<row>.<ext>` directory tree.

use crate::error::{CliError, CliResult};
use geotile_core::{GridPosition, Tile, ZoomScale, MAX_SCALE, MIN_SCALE};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileFile {
    pub scale: ZoomScale,
    pub position: GridPosition,
    pub path: PathBuf,
}

/// Parse the tile identity out of `path`, which must sit exactly three
/// levels below `root`.
pub fn parse_tile_path(root: &Path, path: &Path, extension: &str) -> CliResult<TileFile> {
    let invalid = || CliError::invalid_tile_path(path.to_path_buf());

    let relative = path.strip_prefix(root).map_err(|_| invalid())?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(invalid)?;

    let [z, x, file] = parts.as_slice() else {
        return Err(invalid());
    };
    let y = file
        .strip_suffix(extension)
        .and_then(|s| s.strip_suffix('.'))
        .ok_or_else(invalid)?;

    let scale: u8 = z.parse().map_err(|_| invalid())?;
    if !(MIN_SCALE..=MAX_SCALE).contains(&scale) {
        return Err(invalid());
    }
    let scale = ZoomScale::clamped(scale);
    let column: i32 = x.parse().map_err(|_| invalid())?;
    let row: i32 = y.parse().map_err(|_| invalid())?;
    let position = GridPosition::new(column, row).checked(scale)?;

    Ok(TileFile {
        scale,
        position,
        path: path.to_path_buf(),
    })
}

/// List tile files under `root`, optionally only for one scale.
/// Paths that do not parse are skipped with a warning.
pub fn scan_tile_dir(
    root: &Path,
    extension: &str,
    only: Option<ZoomScale>,
) -> CliResult<Vec<TileFile>> {
    if !root.is_dir() {
        return Err(CliError::directory_not_found(root.to_path_buf()));
    }

    let scale_dirs: Vec<PathBuf> = match only {
        Some(scale) => vec![root.join(scale.get().to_string())],
        None => subdirectories(root)?,
    };

    let mut files = Vec::new();
    for scale_dir in scale_dirs.iter().filter(|d| d.is_dir()) {
        for column_dir in subdirectories(scale_dir)? {
            for entry in std::fs::read_dir(&column_dir)? {
                let path = entry?.path();
                if !path.is_file() {
                    continue;
                }
                match parse_tile_path(root, &path, extension) {
                    Ok(file) => files.push(file),
                    Err(err) => log::warn!("skipping {}: {}", path.display(), err),
                }
            }
        }
    }

    files.sort_by_key(|f| (f.scale, f.position.y, f.position.x));
    Ok(files)
}

/// Decode every listed file. Files that fail to decode are skipped.
pub fn load_tiles(files: &[TileFile]) -> Vec<Tile> {
    files
        .iter()
        .filter_map(|file| match image::open(&file.path) {
            Ok(img) => Some(Tile::new(file.scale, file.position, img.to_rgba8())),
            Err(err) => {
                log::warn!("failed to decode {}: {}", file.path.display(), err);
                None
            }
        })
        .collect()
}

fn subdirectories(dir: &Path) -> CliResult<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
