#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Forward geocoding for points added by street address.
//!
//! [`address::AddressForm`] turns the six free-text address fields into a
//! single query string, and [`opencage::GeocoderClient`] resolves it to
//! coordinates through an OpenCage-compatible `/geocode/v1/json` endpoint.

pub mod address;
pub mod opencage;

use thiserror::Error;
use water_map_point_models::Coordinates;

/// A geocoding result.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    /// Coordinates of the best match (WGS84).
    pub coordinates: Coordinates,
    /// The formatted address returned by the geocoder.
    pub matched_address: Option<String>,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The geocoder answered with a non-success status.
    #[error("Geocoder returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit or daily quota exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// No API key is configured.
    #[error("No geocoder API key configured (set GEOCODER_API_KEY)")]
    MissingApiKey,
}
