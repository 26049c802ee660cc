#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Measurement point types shared across the water map toolchain.
//!
//! The `WaterManager` data service returns [`RawPoint`] records whose fields
//! are untyped strings. After validation and de-duplication they become
//! [`HeatPoint`]s, and the map camera is described by a [`MapRegion`].

use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer, Serialize};

/// Valid latitude range in degrees (WGS84).
pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;

/// Valid longitude range in degrees (WGS84).
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// A measurement record exactly as received from the data service.
///
/// Every field is kept as text; the service has been seen sending strings,
/// bare numbers and nulls for the same column. Anything that is neither a
/// string nor a number deserializes as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPoint {
    /// Latitude as text.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<String>,
    /// Longitude as text.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<String>,
    /// Measured value as text. Becomes the heat weight.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
}

impl RawPoint {
    /// Creates a raw point with all three fields present.
    #[must_use]
    pub fn new(
        latitude: impl Into<String>,
        longitude: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
            value: Some(value.into()),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Text(String),
        Number(f64),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Text(text)) => Some(text),
        Some(Lenient::Number(number)) => Some(number.to_string()),
        Some(Lenient::Other(_)) | None => None,
    })
}

/// A validated map point with an aggregated weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatPoint {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Heat intensity. Sum of every measurement taken at this coordinate.
    pub weight: f64,
}

impl HeatPoint {
    /// Returns `true` when both coordinates are non-zero and in range and
    /// the weight is strictly positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_coordinate(self.latitude, self.longitude)
            && self.weight.is_finite()
            && self.weight > 0.0
    }
}

/// Returns `true` for a finite, non-zero, in-range latitude/longitude pair.
///
/// Zero is treated as "missing": the data service writes `0` when a device
/// had no fix.
#[must_use]
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude != 0.0
        && longitude != 0.0
        && LATITUDE_RANGE.contains(&latitude)
        && LONGITUDE_RANGE.contains(&longitude)
}

/// A latitude/longitude pair (device fix or geocoding result).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

/// Map camera description: a center plus the visible span in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRegion {
    /// Center latitude.
    pub latitude: f64,
    /// Center longitude.
    pub longitude: f64,
    /// Visible latitude span.
    pub latitude_delta: f64,
    /// Visible longitude span.
    pub longitude_delta: f64,
}

impl MapRegion {
    /// Latitude span used when there are no points to fit.
    pub const DEFAULT_LATITUDE_DELTA: f64 = 0.0922;
    /// Longitude span used when there are no points to fit.
    pub const DEFAULT_LONGITUDE_DELTA: f64 = 0.0421;
    /// Center used when neither points nor a device location exist.
    pub const DEFAULT_CENTER: Coordinates = Coordinates {
        latitude: 37.788_25,
        longitude: -122.4324,
    };

    /// Region shown before any data arrives: centered on the device
    /// location when known, otherwise on [`Self::DEFAULT_CENTER`].
    #[must_use]
    pub fn fallback(location: Option<Coordinates>) -> Self {
        let center = location.unwrap_or(Self::DEFAULT_CENTER);
        Self {
            latitude: center.latitude,
            longitude: center.longitude,
            latitude_delta: Self::DEFAULT_LATITUDE_DELTA,
            longitude_delta: Self::DEFAULT_LONGITUDE_DELTA,
        }
    }
}

/// A validated point ready to be inserted into the data service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPoint {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Measured value.
    pub value: f64,
}
