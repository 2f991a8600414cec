//! `geotile locate`: show which tile covers a coordinate.

use crate::error::CliResult;
use geotile_core::{footprint, grid_position_from_geo, GeoPoint, GeoRect, ZoomScale};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocateReport {
    pub longitude: f64,
    pub latitude: f64,
    pub scale: u8,
    pub column: i32,
    pub row: i32,
    pub footprint: GeoRect,
}

pub fn locate(lon: f64, lat: f64, scale: u8) -> CliResult<LocateReport> {
    let point = GeoPoint::try_new(lon, lat)?;
    let scale = ZoomScale::clamped(scale);
    let pos = grid_position_from_geo(point, scale);
    Ok(LocateReport {
        longitude: lon,
        latitude: lat,
        scale: scale.get(),
        column: pos.x,
        row: pos.y,
        footprint: footprint(pos, scale),
    })
}

pub fn run(lon: f64, lat: f64, scale: u8, json: bool) -> CliResult<()> {
    let report = locate(lon, lat, scale)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("scale {}: column {}, row {}", report.scale, report.column, report.row);
        println!(
            "footprint: origin ({:.6}, {:.6}), size {:.6} x {:.6} degrees",
            report.footprint.x, report.footprint.y, report.footprint.width, report.footprint.height
        );
    }
    Ok(())
}
