//! Validation and de-duplication of raw measurement records.
//!
//! Records are dropped when any field is missing or not a finite number,
//! when a coordinate is zero or out of range, or when the value is not
//! strictly positive. Survivors sharing the exact same coordinate are
//! merged and their weights summed. A sum too large for `f64` is capped
//! at [`f64::MAX`].

use std::collections::BTreeMap;

use water_map_point_models::{HeatPoint, RawPoint, is_valid_coordinate};

/// Parses one text field as a finite `f64`.
fn parse_field(field: Option<&str>) -> Option<f64> {
    field?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Converts a raw record into a heat point, or `None` if it is invalid.
#[must_use]
pub fn parse_point(raw: &RawPoint) -> Option<HeatPoint> {
    let latitude = parse_field(raw.latitude.as_deref())?;
    let longitude = parse_field(raw.longitude.as_deref())?;
    let weight = parse_field(raw.value.as_deref())?;

    if !is_valid_coordinate(latitude, longitude) || weight <= 0.0 {
        return None;
    }

    Some(HeatPoint {
        latitude,
        longitude,
        weight,
    })
}

/// Validates every record and merges duplicates.
///
/// The output holds one entry per distinct `(latitude, longitude)` pair in
/// order of first occurrence. An empty result is not an error.
#[must_use]
pub fn normalize(raw: &[RawPoint]) -> Vec<HeatPoint> {
    let mut points: Vec<HeatPoint> = Vec::with_capacity(raw.len());
    // Keyed on bit patterns: zero is already rejected, so -0.0/0.0 can't collide.
    let mut index: BTreeMap<(u64, u64), usize> = BTreeMap::new();
    let mut discarded = 0_usize;
    let mut merged = 0_usize;

    for record in raw {
        let Some(point) = parse_point(record) else {
            discarded += 1;
            continue;
        };

        let key = (point.latitude.to_bits(), point.longitude.to_bits());
        if let Some(&idx) = index.get(&key) {
            points[idx].weight = (points[idx].weight + point.weight).min(f64::MAX);
            merged += 1;
        } else {
            index.insert(key, points.len());
            points.push(point);
        }
    }

    log::debug!(
        "Normalized {} records into {} heat points ({discarded} discarded, {merged} merged)",
        raw.len(),
        points.len()
    );

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(lat: &str, lon: &str, value: &str) -> RawPoint {
        RawPoint::new(lat, lon, value)
    }

    #[test]
    fn keeps_valid_point() {
        let points = normalize(&[raw("-29.68", "-51.13", "2.5")]);
        assert_eq!(
            points,
            vec![HeatPoint {
                latitude: -29.68,
                longitude: -51.13,
                weight: 2.5,
            }]
        );
    }

    #[test]
    fn drops_unparseable_fields() {
        let points = normalize(&[
            raw("abc", "-51.13", "1"),
            raw("-29.68", "", "1"),
            raw("-29.68", "-51.13", "high"),
            raw("NaN", "-51.13", "1"),
            raw("-29.68", "-51.13", "inf"),
            RawPoint::default(),
        ]);
        assert!(points.is_empty());
    }

    #[test]
    fn drops_zero_and_out_of_range_coordinates() {
        let points = normalize(&[
            raw("0", "-51.13", "1"),
            raw("-29.68", "0.0", "1"),
            raw("91", "-51.13", "1"),
            raw("-29.68", "-181", "1"),
        ]);
        assert!(points.is_empty());
    }

    #[test]
    fn drops_non_positive_weights() {
        let points = normalize(&[raw("10", "20", "0"), raw("10", "20", "-3")]);
        assert!(points.is_empty());
    }

    #[test]
    fn accepts_range_boundaries_and_whitespace() {
        let points = normalize(&[raw(" 90 ", "-180", "1"), raw("-90", "180", " 0.5")]);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn merges_duplicate_coordinates() {
        let points = normalize(&[
            raw("10", "20", "1.5"),
            raw("11", "21", "4"),
            raw("10.0", "20.0", "2"),
        ]);
        assert_eq!(points.len(), 2);
        assert_eq!(
            points[0],
            HeatPoint {
                latitude: 10.0,
                longitude: 20.0,
                weight: 3.5,
            }
        );
        assert!((points[1].weight - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn merged_weight_saturates_instead_of_overflowing() {
        let points = normalize(&[raw("10", "20", "1e308"), raw("10", "20", "1e308")]);

        assert_eq!(points.len(), 1);
        assert!(points.iter().all(HeatPoint::is_valid));
        assert!((points[0].weight - f64::MAX).abs() < f64::EPSILON);
    }

    #[test]
    fn every_output_point_is_valid_and_unique() {
        let input: Vec<RawPoint> = [
            ("10", "20", "1"),
            ("10", "20", "1"),
            ("-45.5", "170", "0.2"),
            ("0", "0", "5"),
            ("95", "20", "5"),
            ("12", "x", "5"),
            ("-45.5", "170", "7"),
            ("33", "44", "-1"),
        ]
        .iter()
        .map(|(la, lo, v)| raw(la, lo, v))
        .collect();

        let points = normalize(&input);
        assert!(points.iter().all(HeatPoint::is_valid));

        let mut seen = std::collections::BTreeSet::new();
        for p in &points {
            assert!(seen.insert((p.latitude.to_bits(), p.longitude.to_bits())));
        }
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(normalize(&[]).is_empty());
    }
}
