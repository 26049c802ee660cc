//! Where the terminal front end gets a "device location" from.
//!
//! A terminal has no GPS. The location comes from `--location lat,lon` or
//! the [`LOCATION_ENV`] variable; with neither, the permission counts as
//! refused.

use water_map_app::location::FixedLocation;
use water_map_point_models::{Coordinates, LATITUDE_RANGE, LONGITUDE_RANGE};

/// Environment variable holding a default `lat,lon` location.
pub const LOCATION_ENV: &str = "WATER_MAP_LOCATION";

/// Parses `lat,lon`.
///
/// # Errors
///
/// Returns a message if the text is not two comma-separated numbers within
/// WGS84 ranges.
pub fn parse_location(s: &str) -> Result<Coordinates, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected 'lat,lon', got '{s}'"))?;

    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude '{}': {e}", lat.trim()))?;
    let longitude: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude '{}': {e}", lon.trim()))?;

    if !LATITUDE_RANGE.contains(&latitude) || !LONGITUDE_RANGE.contains(&longitude) {
        return Err(format!("location out of range: {latitude},{longitude}"));
    }

    Ok(Coordinates {
        latitude,
        longitude,
    })
}

/// Picks the location: the explicit one if given, otherwise the value of
/// [`LOCATION_ENV`] as returned by `env`.
pub fn resolve_location<F>(explicit: Option<Coordinates>, env: F) -> FixedLocation
where
    F: Fn(&str) -> Option<String>,
{
    if explicit.is_some() {
        return FixedLocation(explicit);
    }

    let Some(value) = env(LOCATION_ENV).filter(|v| !v.trim().is_empty()) else {
        return FixedLocation(None);
    };

    match parse_location(&value) {
        Ok(coords) => FixedLocation(Some(coords)),
        Err(e) => {
            log::warn!("Ignoring {LOCATION_ENV}: {e}");
            FixedLocation(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lat_lon_pair() {
        assert_eq!(
            parse_location(" -29.68 , -51.13 "),
            Ok(Coordinates {
                latitude: -29.68,
                longitude: -51.13,
            })
        );
    }

    #[test]
    fn rejects_malformed_locations() {
        assert!(parse_location("-29.68").is_err());
        assert!(parse_location("north,-51.13").is_err());
        assert!(parse_location("95,10").is_err());
    }

    #[test]
    fn explicit_location_wins_over_env() {
        let here = Coordinates {
            latitude: 1.0,
            longitude: 2.0,
        };
        let location = resolve_location(Some(here), |_| Some("3,4".to_string()));
        assert_eq!(location.0, Some(here));
    }

    #[test]
    fn env_location_is_used_when_valid() {
        let location = resolve_location(None, |key| {
            (key == LOCATION_ENV).then(|| "3,4".to_string())
        });
        assert_eq!(
            location.0,
            Some(Coordinates {
                latitude: 3.0,
                longitude: 4.0,
            })
        );
    }

    #[test]
    fn missing_or_bad_env_means_denied() {
        assert_eq!(resolve_location(None, |_| None).0, None);
        assert_eq!(resolve_location(None, |_| Some("oops".to_string())).0, None);
    }
}
