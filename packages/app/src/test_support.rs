//! In-memory collaborators for the flow tests.
//!
//! Each fake records what the flow asked of it so tests can assert on
//! calls without a network or a terminal.

use std::sync::Mutex;

use async_trait::async_trait;
use water_map_geocoder::{GeocodeError, GeocodedAddress};
use water_map_point_models::{Coordinates, HeatPoint, MapRegion, NewPoint, RawPoint};
use water_map_water_manager::WaterManagerError;

use crate::notify::{Notification, Notifier};
use crate::progress::ProgressCallback;
use crate::render::{HeatmapRenderer, RenderError};
use crate::services::{AddressGeocoder, PointService};

#[derive(Default)]
pub struct RecordingNotifier {
    pub seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.seen.lock().unwrap().push(notification.clone());
    }
}

/// Counts how often the indicator was cleared.
#[derive(Default)]
pub struct RecordingProgress {
    pub cleared: Mutex<usize>,
}

impl RecordingProgress {
    pub fn clears(&self) -> usize {
        *self.cleared.lock().unwrap()
    }
}

impl ProgressCallback for RecordingProgress {
    fn set_message(&self, _msg: String) {}

    fn finish_and_clear(&self) {
        *self.cleared.lock().unwrap() += 1;
    }
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Vec<(MapRegion, Vec<HeatPoint>)>,
    pub fail: bool,
}

impl HeatmapRenderer for RecordingRenderer {
    fn render(&mut self, region: &MapRegion, points: &[HeatPoint]) -> Result<(), RenderError> {
        self.calls.push((*region, points.to_vec()));
        if self.fail {
            return Err(RenderError::Encoding {
                message: "boom".to_string(),
            });
        }
        Ok(())
    }
}

/// In-memory point service. `fetch` of `None` simulates a failed request;
/// `insert_status` of `Some(code)` makes inserts fail with that status.
#[derive(Default)]
pub struct FakePointService {
    pub fetch: Option<Vec<RawPoint>>,
    pub insert_status: Option<u16>,
    pub fetch_calls: Mutex<usize>,
    pub inserted: Mutex<Vec<NewPoint>>,
}

impl FakePointService {
    pub fn returning(points: Vec<RawPoint>) -> Self {
        Self {
            fetch: Some(points),
            ..Self::default()
        }
    }

    pub fn fetch_calls(&self) -> usize {
        *self.fetch_calls.lock().unwrap()
    }

    pub fn inserted(&self) -> Vec<NewPoint> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl PointService for FakePointService {
    async fn fetch_recent_points(&self) -> Result<Vec<RawPoint>, WaterManagerError> {
        *self.fetch_calls.lock().unwrap() += 1;
        self.fetch.clone().ok_or(WaterManagerError::Status {
            status: 503,
            body: String::new(),
        })
    }

    async fn insert_point(&self, point: &NewPoint) -> Result<(), WaterManagerError> {
        self.inserted.lock().unwrap().push(*point);
        match self.insert_status {
            Some(status) => Err(WaterManagerError::Status {
                status,
                body: String::new(),
            }),
            None => Ok(()),
        }
    }
}

pub enum GeocodeOutcome {
    Found(Coordinates),
    NotFound,
    Fails,
}

pub struct FakeGeocoder {
    pub outcome: GeocodeOutcome,
    pub queries: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn new(outcome: GeocodeOutcome) -> Self {
        Self {
            outcome,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AddressGeocoder for FakeGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.outcome {
            GeocodeOutcome::Found(coordinates) => Ok(Some(GeocodedAddress {
                coordinates: *coordinates,
                matched_address: None,
            })),
            GeocodeOutcome::NotFound => Ok(None),
            GeocodeOutcome::Fails => Err(GeocodeError::Status { status: 500 }),
        }
    }
}
