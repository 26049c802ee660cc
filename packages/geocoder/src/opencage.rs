//! OpenCage-compatible forward geocoder client.
//!
//! Sends `GET {base_url}/geocode/v1/json?q=<address>&key=<api key>` and
//! takes the first entry of `results[].geometry`. The public OpenCage API
//! answers `402` when the daily quota is spent and `429` when requests
//! come in too fast; both map to [`GeocodeError::RateLimited`].
//!
//! See <https://opencagedata.com/api>

use water_map_config::GeocoderConfig;
use water_map_point_models::Coordinates;

use crate::{GeocodeError, GeocodedAddress};

/// Path of the forward geocoding endpoint.
pub const GEOCODE_PATH: &str = "/geocode/v1/json";

/// Geocoder client holding the endpoint and API key.
#[derive(Debug, Clone)]
pub struct GeocoderClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl GeocoderClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::MissingApiKey`] if no API key is configured.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(GeocodeError::MissingApiKey)?;

        Ok(Self {
            client: reqwest::Client::new(),
            url: format!("{}{GEOCODE_PATH}", config.base_url.trim_end_matches('/')),
            api_key,
        })
    }

    /// Geocodes a free-form address query.
    ///
    /// Returns `Ok(None)` when the geocoder finds no match.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the HTTP request fails, the service
    /// reports an error status, or the response cannot be parsed.
    pub async fn geocode(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
        log::debug!("Geocoding '{query}'");

        let resp = self
            .client
            .get(&self.url)
            .query(&[("q", query), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::PAYMENT_REQUIRED
        {
            return Err(GeocodeError::RateLimited);
        }

        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = resp.json().await?;
        let result = parse_response(&body)?;

        match &result {
            Some(found) => log::info!(
                "Geocoded '{query}' to ({}, {})",
                found.coordinates.latitude,
                found.coordinates.longitude
            ),
            None => log::info!("No geocoding match for '{query}'"),
        }

        Ok(result)
    }
}

/// Parses an OpenCage JSON response.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let results = body
        .get("results")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| GeocodeError::Parse {
            message: "Geocoder response missing 'results' array".to_string(),
        })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = first
        .pointer("/geometry/lat")
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing geometry.lat in geocoder response".to_string(),
        })?;

    let lng = first
        .pointer("/geometry/lng")
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing geometry.lng in geocoder response".to_string(),
        })?;

    let formatted = first
        .get("formatted")
        .and_then(serde_json::Value::as_str)
        .map(String::from);

    Ok(Some(GeocodedAddress {
        coordinates: Coordinates {
            latitude: lat,
            longitude: lng,
        },
        matched_address: formatted,
    }))
}
