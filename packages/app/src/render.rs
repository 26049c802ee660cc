//! Heatmap display collaborator.

use thiserror::Error;
use water_map_point_models::{HeatPoint, MapRegion};

/// Errors a renderer may report.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Output could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be encoded.
    #[error("Encoding error: {message}")]
    Encoding {
        /// What failed.
        message: String,
    },
}

/// Draws a heatmap of weighted points inside a map region.
pub trait HeatmapRenderer: Send {
    /// Renders `points` as `(lat, lon, weight)` triples with the camera on
    /// `region`. Only called with a non-empty point list.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the output cannot be produced.
    fn render(&mut self, region: &MapRegion, points: &[HeatPoint]) -> Result<(), RenderError>;
}
