//! Add-point screen.
//!
//! Two ways to add a measurement:
//!
//! - [`submit_point`] takes latitude, longitude and value as typed text.
//! - [`submit_address`] geocodes an [`AddressForm`] and stores the result
//!   with a fixed default weight.
//!
//! Invalid input is rejected before any request goes out. Every outcome
//! is shown through the [`Notifier`] and also returned.

use water_map_geocoder::GeocodeError;
use water_map_geocoder::address::AddressForm;
use water_map_point_models::NewPoint;

use crate::notify::{Notification, Notifier};
use crate::services::{AddressGeocoder, PointService};

/// The numeric add-point form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointForm {
    /// Latitude text.
    pub latitude: String,
    /// Longitude text.
    pub longitude: String,
    /// Value text.
    pub value: String,
}

impl PointForm {
    /// Validates the form.
    ///
    /// # Errors
    ///
    /// Returns [`Notification::MissingFields`] if any field is blank and
    /// [`Notification::InvalidNumbers`] if any field is not a finite number.
    pub fn validate(&self) -> Result<NewPoint, Notification> {
        let fields = [&self.latitude, &self.longitude, &self.value];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(Notification::MissingFields);
        }

        let parse = |s: &str| {
            s.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or(Notification::InvalidNumbers)
        };

        Ok(NewPoint {
            latitude: parse(&self.latitude)?,
            longitude: parse(&self.longitude)?,
            value: parse(&self.value)?,
        })
    }
}

/// Validates the numeric form and inserts the point.
///
/// # Errors
///
/// Returns the [`Notification`] shown to the user when validation or the
/// insert fails.
pub async fn submit_point(
    service: &dyn PointService,
    form: &PointForm,
    notifier: &dyn Notifier,
) -> Result<NewPoint, Notification> {
    let point = match form.validate() {
        Ok(point) => point,
        Err(rejection) => {
            log::debug!("Rejected point form: {rejection}");
            notifier.notify(&rejection);
            return Err(rejection);
        }
    };

    save(service, point, notifier).await
}

/// Geocodes the address form and inserts the resulting point with
/// `default_weight` as its value.
///
/// `geocoder` is `None` when no geocoding service is configured.
///
/// # Errors
///
/// Returns the [`Notification`] shown to the user when the address is
/// blank, cannot be resolved, or the insert fails.
pub async fn submit_address(
    geocoder: Option<&dyn AddressGeocoder>,
    service: &dyn PointService,
    form: &AddressForm,
    default_weight: f64,
    notifier: &dyn Notifier,
) -> Result<NewPoint, Notification> {
    let result = resolve_address(geocoder, form).await;
    let coordinates = match result {
        Ok(coordinates) => coordinates,
        Err(rejection) => {
            notifier.notify(&rejection);
            return Err(rejection);
        }
    };

    let point = NewPoint {
        latitude: coordinates.latitude,
        longitude: coordinates.longitude,
        value: default_weight,
    };

    save(service, point, notifier).await
}

async fn resolve_address(
    geocoder: Option<&dyn AddressGeocoder>,
    form: &AddressForm,
) -> Result<water_map_point_models::Coordinates, Notification> {
    let Some(query) = form.to_query() else {
        return Err(Notification::EmptyAddress);
    };

    let Some(geocoder) = geocoder else {
        log::warn!("Address submission attempted without a geocoder");
        return Err(Notification::GeocoderUnavailable);
    };

    match geocoder.geocode(&query).await {
        Ok(Some(found)) => Ok(found.coordinates),
        Ok(None) => Err(Notification::AddressNotFound),
        Err(GeocodeError::MissingApiKey) => Err(Notification::GeocoderUnavailable),
        Err(e) => {
            log::error!("Geocoding '{query}' failed: {e}");
            Err(Notification::GeocodingFailed)
        }
    }
}

async fn save(
    service: &dyn PointService,
    point: NewPoint,
    notifier: &dyn Notifier,
) -> Result<NewPoint, Notification> {
    match service.insert_point(&point).await {
        Ok(()) => {
            notifier.notify(&Notification::PointSaved);
            Ok(point)
        }
        Err(e) => {
            log::error!("Failed to save point: {e}");
            notifier.notify(&Notification::SaveFailed);
            Err(Notification::SaveFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use water_map_point_models::Coordinates;

    use super::*;
    use crate::test_support::{FakeGeocoder, FakePointService, GeocodeOutcome, RecordingNotifier};

    fn form(lat: &str, lon: &str, value: &str) -> PointForm {
        PointForm {
            latitude: lat.to_string(),
            longitude: lon.to_string(),
            value: value.to_string(),
        }
    }

    fn address() -> AddressForm {
        AddressForm {
            street: "Rua Sete de Setembro".to_string(),
            number: "1200".to_string(),
            city: "Novo Hamburgo".to_string(),
            ..AddressForm::default()
        }
    }

    #[test]
    fn validate_parses_trimmed_numbers() {
        assert_eq!(
            form(" -29.5 ", "-51.25", "3").validate(),
            Ok(NewPoint {
                latitude: -29.5,
                longitude: -51.25,
                value: 3.0,
            })
        );
    }

    #[test]
    fn validate_rejects_blank_before_numbers() {
        assert_eq!(
            form("", "abc", "1").validate(),
            Err(Notification::MissingFields)
        );
        assert_eq!(
            form("1", "2", "  ").validate(),
            Err(Notification::MissingFields)
        );
    }

    #[test]
    fn validate_rejects_non_numbers() {
        assert_eq!(
            form("north", "2", "1").validate(),
            Err(Notification::InvalidNumbers)
        );
        assert_eq!(
            form("1", "2", "NaN").validate(),
            Err(Notification::InvalidNumbers)
        );
    }

    #[tokio::test]
    async fn non_numeric_latitude_never_reaches_network() {
        let service = FakePointService::default();
        let notifier = RecordingNotifier::default();

        let result = submit_point(&service, &form("abc", "-51.1", "2"), &notifier).await;

        assert_eq!(result, Err(Notification::InvalidNumbers));
        assert!(service.inserted().is_empty());
        assert_eq!(notifier.notifications(), vec![Notification::InvalidNumbers]);
    }

    #[tokio::test]
    async fn valid_point_is_saved() {
        let service = FakePointService::default();
        let notifier = RecordingNotifier::default();

        let saved = submit_point(&service, &form("-29.5", "-51.25", "3"), &notifier)
            .await
            .unwrap();

        assert_eq!(service.inserted(), vec![saved]);
        assert_eq!(notifier.notifications(), vec![Notification::PointSaved]);
    }

    #[tokio::test]
    async fn insert_failure_is_generic_failure() {
        let service = FakePointService {
            insert_status: Some(500),
            ..FakePointService::default()
        };
        let notifier = RecordingNotifier::default();

        let result = submit_point(&service, &form("1", "2", "3"), &notifier).await;

        assert_eq!(result, Err(Notification::SaveFailed));
        assert_eq!(notifier.notifications(), vec![Notification::SaveFailed]);
    }

    #[tokio::test]
    async fn address_is_geocoded_and_saved_with_default_weight() {
        let here = Coordinates {
            latitude: -29.68,
            longitude: -51.13,
        };
        let geocoder = FakeGeocoder::new(GeocodeOutcome::Found(here));
        let service = FakePointService::default();
        let notifier = RecordingNotifier::default();

        let saved = submit_address(Some(&geocoder), &service, &address(), 1.0, &notifier)
            .await
            .unwrap();

        assert_eq!(
            geocoder.queries(),
            vec!["Rua Sete de Setembro, 1200, Novo Hamburgo".to_string()]
        );
        assert_eq!(
            saved,
            NewPoint {
                latitude: -29.68,
                longitude: -51.13,
                value: 1.0,
            }
        );
        assert_eq!(service.inserted(), vec![saved]);
        assert_eq!(notifier.notifications(), vec![Notification::PointSaved]);
    }

    #[tokio::test]
    async fn unknown_address_is_not_inserted() {
        let geocoder = FakeGeocoder::new(GeocodeOutcome::NotFound);
        let service = FakePointService::default();
        let notifier = RecordingNotifier::default();

        let result = submit_address(Some(&geocoder), &service, &address(), 1.0, &notifier).await;

        assert_eq!(result, Err(Notification::AddressNotFound));
        assert!(service.inserted().is_empty());
    }

    #[tokio::test]
    async fn geocoder_failure_is_not_inserted() {
        let geocoder = FakeGeocoder::new(GeocodeOutcome::Fails);
        let service = FakePointService::default();
        let notifier = RecordingNotifier::default();

        let result = submit_address(Some(&geocoder), &service, &address(), 1.0, &notifier).await;

        assert_eq!(result, Err(Notification::GeocodingFailed));
        assert!(service.inserted().is_empty());
        assert_eq!(notifier.notifications(), vec![Notification::GeocodingFailed]);
    }

    #[tokio::test]
    async fn blank_address_never_reaches_geocoder() {
        let geocoder = FakeGeocoder::new(GeocodeOutcome::NotFound);
        let service = FakePointService::default();
        let notifier = RecordingNotifier::default();

        let result = submit_address(
            Some(&geocoder),
            &service,
            &AddressForm::default(),
            1.0,
            &notifier,
        )
        .await;

        assert_eq!(result, Err(Notification::EmptyAddress));
        assert!(geocoder.queries().is_empty());
    }

    #[tokio::test]
    async fn missing_geocoder_is_reported() {
        let service = FakePointService::default();
        let notifier = RecordingNotifier::default();

        let result = submit_address(None, &service, &address(), 1.0, &notifier).await;

        assert_eq!(result, Err(Notification::GeocoderUnavailable));
        assert!(service.inserted().is_empty());
    }
}
