//! Configuration handling for the geotile CLI
//!
//! Supports loading configuration from geotile.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use geotile_render::{RenderConfig, DEFAULT_CENTER, DEFAULT_SCALE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub tiles: TilesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Center longitude in degrees
    #[serde(default = "default_longitude")]
    pub longitude: f64,

    /// Center latitude in degrees
    #[serde(default = "default_latitude")]
    pub latitude: f64,

    /// Zoom scale, clamped to 1..=18
    #[serde(default = "default_scale")]
    pub scale: u8,

    /// Output width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Output height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilesConfig {
    /// Root of a <scale>/<column>/<row> tile tree
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Tile file extension
    #[serde(default = "default_extension")]
    pub extension: String,
}

// Default value functions
fn default_longitude() -> f64 { DEFAULT_CENTER.longitude }
fn default_latitude() -> f64 { DEFAULT_CENTER.latitude }
fn default_scale() -> u8 { DEFAULT_SCALE }
fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }
fn default_extension() -> String { "png".to_string() }

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            longitude: default_longitude(),
            latitude: default_latitude(),
            scale: default_scale(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for TilesConfig {
    fn default() -> Self {
        Self {
            dir: None,
            extension: default_extension(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from("geotile.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: geotile.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default())
            .context("Failed to serialize default configuration")
    }
}
