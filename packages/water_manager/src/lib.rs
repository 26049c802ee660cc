#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the `WaterManager` data service.
//!
//! The service exposes a single `GET /WaterManager` endpoint whose `op`
//! query parameter selects the operation:
//!
//! - `op=SELECT` returns a JSON array of [`RawPoint`] records for one
//!   product inside a date window, capped by `LIMIT`.
//! - `op=INSERT` stores one measurement; any 2xx status means success.
//!
//! Requests are sent once. There is no retry and no timeout.

use chrono::{Local, Months, NaiveDate};
use thiserror::Error;
use water_map_config::WaterManagerConfig;
use water_map_point_models::{NewPoint, RawPoint};

/// Path of the service endpoint, appended to the configured base URL.
pub const ENDPOINT_PATH: &str = "/WaterManager";

/// Date format expected by `DATEINI` / `DATAFIN`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Maximum length of the response body preview kept in errors.
const BODY_PREVIEW_LEN: usize = 200;

/// Errors from data service requests.
#[derive(Debug, Error)]
pub enum WaterManagerError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("WaterManager returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Start of the response body.
        body: String,
    },

    /// The response body is not a JSON array of point records.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client for one product of the `WaterManager` service.
#[derive(Debug, Clone)]
pub struct WaterManagerClient {
    client: reqwest::Client,
    endpoint: String,
    product_id: String,
    vendor_id: String,
    result_limit: u32,
    window_months: u32,
}

impl WaterManagerClient {
    /// Creates a client from configuration.
    #[must_use]
    pub fn new(config: &WaterManagerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{ENDPOINT_PATH}", config.base_url.trim_end_matches('/')),
            product_id: config.product_id.clone(),
            vendor_id: config.vendor_id.clone(),
            result_limit: config.result_limit,
            window_months: config.window_months,
        }
    }

    /// Full endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetches the points recorded in the window ending today.
    ///
    /// # Errors
    ///
    /// See [`WaterManagerClient::fetch_points_until`].
    pub async fn fetch_recent_points(&self) -> Result<Vec<RawPoint>, WaterManagerError> {
        self.fetch_points_until(Local::now().date_naive()).await
    }

    /// Fetches up to `result_limit` points recorded between
    /// `window_months` before `end` and `end`.
    ///
    /// # Errors
    ///
    /// Returns [`WaterManagerError`] on transport failure, a non-2xx
    /// status, or a body that is not a JSON array of records.
    pub async fn fetch_points_until(
        &self,
        end: NaiveDate,
    ) -> Result<Vec<RawPoint>, WaterManagerError> {
        let (start, end) = fetch_window(end, self.window_months);
        let start = start.format(DATE_FORMAT).to_string();
        let end = end.format(DATE_FORMAT).to_string();
        let limit = self.result_limit.to_string();

        log::info!(
            "Fetching points for product {} from {start} to {end} (limit {limit})",
            self.product_id
        );

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("op", "SELECT"),
                ("PRODUCTID", self.product_id.as_str()),
                ("DATEINI", start.as_str()),
                ("DATAFIN", end.as_str()),
                ("LIMIT", limit.as_str()),
                ("FORMAT", "JSON"),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let records: Vec<RawPoint> = serde_json::from_str(&body)?;
        log::info!("Received {} point records", records.len());

        Ok(records)
    }

    /// Inserts one measurement.
    ///
    /// # Errors
    ///
    /// Returns [`WaterManagerError`] on transport failure or a non-2xx
    /// status.
    pub async fn insert_point(&self, point: &NewPoint) -> Result<(), WaterManagerError> {
        let latitude = point.latitude.to_string();
        let longitude = point.longitude.to_string();
        let value = point.value.to_string();

        log::info!("Inserting point ({latitude}, {longitude}) = {value}");

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("op", "INSERT"),
                ("VENDORID", self.vendor_id.as_str()),
                ("PRODUCTID", self.product_id.as_str()),
                ("LATITUDE", latitude.as_str()),
                ("LONGITUDE", longitude.as_str()),
                ("VALUE", value.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        Ok(())
    }
}

/// Returns the `(start, end)` dates of a window of `months` months ending
/// on `end`. A start day that does not exist in its month is clamped to
/// that month's last day.
#[must_use]
pub fn fetch_window(end: NaiveDate, months: u32) -> (NaiveDate, NaiveDate) {
    let start = end.checked_sub_months(Months::new(months)).unwrap_or(end);
    (start, end)
}

fn status_error(status: reqwest::StatusCode, body: &str) -> WaterManagerError {
    let body = body.chars().take(BODY_PREVIEW_LEN).collect::<String>();
    log::warn!("WaterManager returned {status}: {body}");
    WaterManagerError::Status {
        status: status.as_u16(),
        body,
    }
}
