//! Device location collaborator.

use async_trait::async_trait;
use water_map_point_models::Coordinates;

/// Outcome of a one-shot location request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationStatus {
    /// Permission granted; the current fix.
    Granted(Coordinates),
    /// Permission refused.
    Denied,
}

/// Asks for location permission and returns the current position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Performs the permission prompt and position read.
    async fn current_location(&self) -> LocationStatus;
}

/// A provider with a pre-set answer. `None` behaves as a refused
/// permission.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Option<Coordinates>);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> LocationStatus {
        self.0.map_or(LocationStatus::Denied, LocationStatus::Granted)
    }
}
