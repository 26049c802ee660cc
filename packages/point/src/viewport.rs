//! Map region fitting.

use geo::{BoundingRect, MultiPoint, Point};
use water_map_point_models::{HeatPoint, MapRegion};

/// Degrees added to each span so edge points are not drawn on the border.
pub const REGION_PADDING: f64 = 0.1;

/// Computes the region centered on the bounding box of `points`, padded by
/// [`REGION_PADDING`] on each axis.
///
/// Returns `None` for an empty slice; the caller picks a default region.
#[must_use]
pub fn fit_region(points: &[HeatPoint]) -> Option<MapRegion> {
    let multi: MultiPoint<f64> = points
        .iter()
        .map(|p| Point::new(p.longitude, p.latitude))
        .collect();

    let rect = multi.bounding_rect()?;
    let (min, max) = (rect.min(), rect.max());

    Some(MapRegion {
        latitude: (min.y + max.y) / 2.0,
        longitude: (min.x + max.x) / 2.0,
        latitude_delta: (max.y - min.y).abs() + REGION_PADDING,
        longitude_delta: (max.x - min.x).abs() + REGION_PADDING,
    })
}
