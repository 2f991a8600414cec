//! Rendering options shared by library hosts and the CLI.

use image::Rgba;
use serde::{Deserialize, Serialize};

/// Order in which visible tiles are composited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintOrder {
    /// Sort by (row, column) so overlaps resolve the same way every time
    #[default]
    RowMajor,
    /// Whatever order the spatial index yields
    IndexOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Fill colour for regenerated surfaces, `#rrggbb` or `#rrggbbaa`
    #[serde(default = "default_background")]
    pub background: String,

    /// Extra pixels added to the view width and height before querying
    #[serde(default = "default_overscan")]
    pub overscan_px: u32,

    #[serde(default)]
    pub paint_order: PaintOrder,
}

fn default_background() -> String { "#ffffff".to_string() }
fn default_overscan() -> u32 { 512 }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            overscan_px: default_overscan(),
            paint_order: PaintOrder::default(),
        }
    }
}

impl RenderConfig {
    /// Parsed background colour; malformed strings fall back to opaque white.
    pub fn background_rgba(&self) -> Rgba<u8> {
        parse_hex_color(&self.background).unwrap_or_else(|| {
            log::warn!("invalid background colour {:?}, using white", self.background);
            Rgba([255, 255, 255, 255])
        })
    }
}

fn parse_hex_color(s: &str) -> Option<Rgba<u8>> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        6 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255])),
        8 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, channel(6)?])),
        _ => None,
    }
}
