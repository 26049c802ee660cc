//! Heatmap screen.
//!
//! One refresh runs: location prompt, point fetch, normalization, region
//! fit, render. A refused location permission or a failed fetch ends the
//! refresh with display text and nothing is drawn. An empty point set
//! raises [`Notification::NoValidPoints`] and nothing is drawn either.
//!
//! The flow owns the progress indicator it is given and clears it on every
//! path before returning.

use water_map_point::{fit_region, normalize};
use water_map_point_models::{Coordinates, HeatPoint, MapRegion};

use crate::location::{LocationProvider, LocationStatus};
use crate::notify::{Notification, Notifier};
use crate::progress::ProgressCallback;
use crate::render::HeatmapRenderer;
use crate::services::PointService;

/// State of the heatmap screen after one refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapScreen {
    /// Device location, when permission was granted.
    pub location: Option<Coordinates>,
    /// Normalized points. Replaced wholesale on every refresh.
    pub points: Vec<HeatPoint>,
    /// Region fitted to `points`; `None` when there are none.
    pub region: Option<MapRegion>,
    /// Text shown instead of the map.
    pub error: Option<Notification>,
}

impl HeatmapScreen {
    fn failed(location: Option<Coordinates>, error: Notification) -> Self {
        Self {
            location,
            points: Vec::new(),
            region: None,
            error: Some(error),
        }
    }

    /// Whether the map is shown at all.
    #[must_use]
    pub const fn map_visible(&self) -> bool {
        self.error.is_none()
    }

    /// Region the map camera should show: the fitted region, or the
    /// fallback around the device location.
    #[must_use]
    pub fn display_region(&self) -> MapRegion {
        self.region
            .unwrap_or_else(|| MapRegion::fallback(self.location))
    }
}

/// Runs one refresh of the heatmap screen.
pub async fn load_heatmap(
    location: &dyn LocationProvider,
    service: &dyn PointService,
    renderer: &mut dyn HeatmapRenderer,
    notifier: &dyn Notifier,
    progress: &dyn ProgressCallback,
) -> HeatmapScreen {
    let location = match location.current_location().await {
        LocationStatus::Granted(coords) => coords,
        LocationStatus::Denied => {
            progress.finish_and_clear();
            log::warn!("Location permission denied; map disabled");
            return HeatmapScreen::failed(None, Notification::LocationPermissionDenied);
        }
    };

    progress.set_message("Fetching points...".to_string());
    let fetched = service.fetch_recent_points().await;
    progress.finish_and_clear();

    let raw = match fetched {
        Ok(raw) => raw,
        Err(e) => {
            log::error!("Failed to fetch points: {e}");
            return HeatmapScreen::failed(Some(location), Notification::FetchFailed);
        }
    };

    let points = normalize(&raw);
    let Some(region) = fit_region(&points) else {
        log::info!("No valid points among {} records", raw.len());
        notifier.notify(&Notification::NoValidPoints);
        return HeatmapScreen {
            location: Some(location),
            points,
            region: None,
            error: None,
        };
    };

    if let Err(e) = renderer.render(&region, &points) {
        log::error!("Failed to render heatmap: {e}");
        notifier.notify(&Notification::RenderFailed);
    }

    HeatmapScreen {
        location: Some(location),
        points,
        region: Some(region),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use water_map_point_models::RawPoint;

    use super::*;
    use crate::location::FixedLocation;
    use crate::progress::NullProgress;
    use crate::test_support::{
        FakePointService, RecordingNotifier, RecordingProgress, RecordingRenderer,
    };

    const HERE: Coordinates = Coordinates {
        latitude: -29.68,
        longitude: -51.13,
    };

    #[tokio::test]
    async fn renders_normalized_points_in_fitted_region() {
        let service = FakePointService::returning(vec![
            RawPoint::new("0", "0", "1"),
            RawPoint::new("10", "20", "2"),
            RawPoint::new("10", "20", "3"),
            RawPoint::new("12", "22", "1"),
        ]);
        let mut renderer = RecordingRenderer::default();
        let notifier = RecordingNotifier::default();

        let screen = load_heatmap(
            &FixedLocation(Some(HERE)),
            &service,
            &mut renderer,
            &notifier,
            &NullProgress,
        )
        .await;

        assert!(screen.map_visible());
        assert_eq!(screen.points.len(), 2);
        assert!((screen.points[0].weight - 5.0).abs() < f64::EPSILON);

        let region = screen.region.unwrap();
        assert!((region.latitude - 11.0).abs() < 1e-9);
        assert!((region.longitude - 21.0).abs() < 1e-9);
        assert_eq!(screen.display_region(), region);

        assert_eq!(renderer.calls.len(), 1);
        assert_eq!(renderer.calls[0].0, region);
        assert_eq!(renderer.calls[0].1, screen.points);
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn empty_point_set_notifies_and_skips_renderer() {
        let service = FakePointService::returning(vec![
            RawPoint::new("0", "0", "1"),
            RawPoint::new("bad", "20", "1"),
        ]);
        let mut renderer = RecordingRenderer::default();
        let notifier = RecordingNotifier::default();

        let screen = load_heatmap(
            &FixedLocation(Some(HERE)),
            &service,
            &mut renderer,
            &notifier,
            &NullProgress,
        )
        .await;

        assert!(renderer.calls.is_empty());
        assert_eq!(notifier.notifications(), vec![Notification::NoValidPoints]);
        assert!(screen.map_visible());
        assert!(screen.points.is_empty());
        assert!(screen.region.is_none());
        assert_eq!(screen.display_region(), MapRegion::fallback(Some(HERE)));
    }

    #[tokio::test]
    async fn denied_permission_disables_map_without_fetching() {
        let service = FakePointService::returning(vec![RawPoint::new("10", "20", "1")]);
        let mut renderer = RecordingRenderer::default();
        let notifier = RecordingNotifier::default();

        let screen = load_heatmap(
            &FixedLocation(None),
            &service,
            &mut renderer,
            &notifier,
            &NullProgress,
        )
        .await;

        assert_eq!(screen.error, Some(Notification::LocationPermissionDenied));
        assert!(!screen.map_visible());
        assert_eq!(service.fetch_calls(), 0);
        assert!(renderer.calls.is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_becomes_display_text() {
        let service = FakePointService::default();
        let mut renderer = RecordingRenderer::default();
        let notifier = RecordingNotifier::default();

        let screen = load_heatmap(
            &FixedLocation(Some(HERE)),
            &service,
            &mut renderer,
            &notifier,
            &NullProgress,
        )
        .await;

        assert_eq!(screen.error, Some(Notification::FetchFailed));
        assert_eq!(screen.location, Some(HERE));
        assert!(renderer.calls.is_empty());
    }

    #[tokio::test]
    async fn render_failure_is_notified() {
        let service = FakePointService::returning(vec![RawPoint::new("10", "20", "1")]);
        let mut renderer = RecordingRenderer {
            fail: true,
            ..RecordingRenderer::default()
        };
        let notifier = RecordingNotifier::default();

        let screen = load_heatmap(
            &FixedLocation(Some(HERE)),
            &service,
            &mut renderer,
            &notifier,
            &NullProgress,
        )
        .await;

        assert_eq!(notifier.notifications(), vec![Notification::RenderFailed]);
        assert!(screen.region.is_some());
    }

    #[tokio::test]
    async fn progress_is_cleared_exactly_once_on_every_path() {
        for (location, service) in [
            (None, FakePointService::returning(vec![RawPoint::new("10", "20", "1")])),
            (Some(HERE), FakePointService::default()),
            (Some(HERE), FakePointService::returning(vec![])),
            (Some(HERE), FakePointService::returning(vec![RawPoint::new("10", "20", "1")])),
        ] {
            let progress = RecordingProgress::default();
            load_heatmap(
                &FixedLocation(location),
                &service,
                &mut RecordingRenderer::default(),
                &RecordingNotifier::default(),
                &progress,
            )
            .await;

            assert_eq!(progress.clears(), 1);
        }
    }

    #[tokio::test]
    async fn refresh_can_run_on_a_spawned_task() {
        let handle = tokio::spawn(async {
            let service = FakePointService::returning(vec![RawPoint::new("10", "20", "1")]);
            let mut renderer = RecordingRenderer::default();
            load_heatmap(
                &FixedLocation(Some(HERE)),
                &service,
                &mut renderer,
                &RecordingNotifier::default(),
                &NullProgress,
            )
            .await
        });

        let screen = handle.await.unwrap();
        assert_eq!(screen.points.len(), 1);
    }
}
