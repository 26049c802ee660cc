//! Heatmap renderers for the terminal front end.
//!
//! [`TerminalRenderer`] draws a shaded character grid; [`GeoJsonRenderer`]
//! writes a `FeatureCollection` with one weighted `Point` per heat point.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use water_map_app::render::{HeatmapRenderer, RenderError};
use water_map_point_models::{HeatPoint, MapRegion};

const GRID_WIDTH: usize = 48;
const GRID_HEIGHT: usize = 20;

/// Shades from empty to hottest.
const SHADES: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Draws the heatmap as a character grid covering the region.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> HeatmapRenderer for TerminalRenderer<W> {
    fn render(&mut self, region: &MapRegion, points: &[HeatPoint]) -> Result<(), RenderError> {
        let grid = heat_grid(region, points);
        let max = grid.iter().flatten().copied().fold(0.0, f64::max);
        let total: f64 = points.iter().map(|p| p.weight).sum();

        writeln!(
            self.out,
            "Center ({:.5}, {:.5}), span {:.4} x {:.4} degrees",
            region.latitude, region.longitude, region.latitude_delta, region.longitude_delta
        )?;

        let border = format!("+{}+", "-".repeat(GRID_WIDTH));
        writeln!(self.out, "{border}")?;
        for row in &grid {
            let line: String = row.iter().map(|&cell| shade(cell, max)).collect();
            writeln!(self.out, "|{line}|")?;
        }
        writeln!(self.out, "{border}")?;

        writeln!(
            self.out,
            "{} point(s), total weight {total:.2}",
            points.len()
        )?;
        self.out.flush()?;

        Ok(())
    }
}

/// Sums point weights into grid cells. Row 0 is the northern edge.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn heat_grid(region: &MapRegion, points: &[HeatPoint]) -> Vec<Vec<f64>> {
    let mut grid = vec![vec![0.0; GRID_WIDTH]; GRID_HEIGHT];

    let north = region.latitude + region.latitude_delta / 2.0;
    let west = region.longitude - region.longitude_delta / 2.0;

    for point in points {
        let y = (north - point.latitude) / region.latitude_delta;
        let x = (point.longitude - west) / region.longitude_delta;
        if !(0.0..=1.0).contains(&y) || !(0.0..=1.0).contains(&x) {
            continue;
        }

        let row = ((y * GRID_HEIGHT as f64) as usize).min(GRID_HEIGHT - 1);
        let col = ((x * GRID_WIDTH as f64) as usize).min(GRID_WIDTH - 1);
        grid[row][col] += point.weight;
    }

    grid
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn shade(cell: f64, max: f64) -> char {
    if cell <= 0.0 || max <= 0.0 {
        return SHADES[0];
    }
    let top = SHADES.len() - 1;
    let level = ((cell / max) * top as f64).ceil() as usize;
    SHADES[level.clamp(1, top)]
}

/// Writes the heatmap to a `GeoJSON` file.
pub struct GeoJsonRenderer {
    path: PathBuf,
}

impl GeoJsonRenderer {
    /// Creates a renderer that (over)writes `path` on every render.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HeatmapRenderer for GeoJsonRenderer {
    fn render(&mut self, region: &MapRegion, points: &[HeatPoint]) -> Result<(), RenderError> {
        let collection = feature_collection(region, points)?;

        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &collection).map_err(|e| {
            RenderError::Encoding {
                message: e.to_string(),
            }
        })?;
        writer.flush()?;

        log::info!(
            "Wrote {} point(s) to {}",
            points.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Builds a `FeatureCollection` of weighted points. The region is stored
/// as the foreign member `region`.
fn feature_collection(
    region: &MapRegion,
    points: &[HeatPoint],
) -> Result<FeatureCollection, RenderError> {
    let features = points
        .iter()
        .map(|p| {
            let mut properties = JsonObject::new();
            properties.insert("weight".to_string(), serde_json::Value::from(p.weight));

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::from(&geo::Point::new(
                    p.longitude,
                    p.latitude,
                )))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let region = serde_json::to_value(region).map_err(|e| RenderError::Encoding {
        message: e.to_string(),
    })?;
    let mut foreign_members = JsonObject::new();
    foreign_members.insert("region".to_string(), region);

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign_members),
    })
}
