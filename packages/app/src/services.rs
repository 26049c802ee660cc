//! Remote collaborators used by the flows.
//!
//! The traits let the flows run against the real HTTP clients or against
//! in-memory fakes.

use async_trait::async_trait;
use water_map_geocoder::opencage::GeocoderClient;
use water_map_geocoder::{GeocodeError, GeocodedAddress};
use water_map_point_models::{NewPoint, RawPoint};
use water_map_water_manager::{WaterManagerClient, WaterManagerError};

/// Source and sink of measurement points.
#[async_trait]
pub trait PointService: Send + Sync {
    /// Fetches the recent raw records.
    ///
    /// # Errors
    ///
    /// Returns [`WaterManagerError`] if the request fails.
    async fn fetch_recent_points(&self) -> Result<Vec<RawPoint>, WaterManagerError>;

    /// Inserts one point.
    ///
    /// # Errors
    ///
    /// Returns [`WaterManagerError`] if the request fails.
    async fn insert_point(&self, point: &NewPoint) -> Result<(), WaterManagerError>;
}

#[async_trait]
impl PointService for WaterManagerClient {
    async fn fetch_recent_points(&self) -> Result<Vec<RawPoint>, WaterManagerError> {
        Self::fetch_recent_points(self).await
    }

    async fn insert_point(&self, point: &NewPoint) -> Result<(), WaterManagerError> {
        Self::insert_point(self, point).await
    }
}

/// Resolves a one-line address to coordinates.
#[async_trait]
pub trait AddressGeocoder: Send + Sync {
    /// Geocodes `query`; `Ok(None)` means no match.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the lookup fails.
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError>;
}

#[async_trait]
impl AddressGeocoder for GeocoderClient {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
        Self::geocode(self, query).await
    }
}
