//! Regional extraction by latitude/longitude box.

use tracing::debug;
use wind_common::{FieldShape, LatLonRange, WindField};

/// Keep only the cells whose coordinates fall inside `range` (inclusive).
///
/// The result is a flat field: cells keep their row-major order but the
/// grid structure is dropped. Time and level are carried over unchanged.
/// A box that selects nothing yields an empty field.
pub fn extract_regional_data(field: &WindField, range: &LatLonRange) -> WindField {
    let selected: Vec<usize> = field
        .lats
        .iter()
        .zip(&field.lons)
        .enumerate()
        .filter(|(_, (&lat, &lon))| range.contains(f64::from(lat), f64::from(lon)))
        .map(|(i, _)| i)
        .collect();

    let pick = |values: &[f32]| -> Vec<f32> {
        selected
            .iter()
            .filter_map(|&i| values.get(i).copied())
            .collect()
    };

    debug!(
        selected = selected.len(),
        total = field.len(),
        lat_min = range.lat_min,
        lat_max = range.lat_max,
        lon_min = range.lon_min,
        lon_max = range.lon_max,
        "Extracted regional wind data"
    );

    WindField {
        u: pick(&field.u),
        v: pick(&field.v),
        lats: pick(&field.lats),
        lons: pick(&field.lons),
        shape: FieldShape::Flat(selected.len()),
        time: field.time,
        level: field.level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn field_2x2() -> WindField {
        WindField::new(
            vec![1.0, 2.0, 3.0, 4.0],
            vec![-1.0, -2.0, -3.0, -4.0],
            vec![50.0, 50.0, 40.0, 40.0],
            vec![0.0, 10.0, 0.0, 10.0],
            FieldShape::Grid { rows: 2, cols: 2 },
            Utc.with_ymd_and_hms(2020, 1, 1, 6, 0, 0).unwrap(),
            500.0,
        )
        .unwrap()
    }

    #[test]
    fn test_inclusive_bounds() {
        let field = field_2x2();
        let region = extract_regional_data(&field, &LatLonRange::new((40.0, 50.0), (0.0, 0.0)));

        assert_eq!(region.shape, FieldShape::Flat(2));
        assert_eq!(region.u, vec![1.0, 3.0]);
        assert_eq!(region.v, vec![-1.0, -3.0]);
        assert_eq!(region.lats, vec![50.0, 40.0]);
        assert_eq!(region.lons, vec![0.0, 0.0]);
    }

    #[test]
    fn test_metadata_preserved() {
        let field = field_2x2();
        let region = extract_regional_data(&field, &LatLonRange::new((45.0, 60.0), (5.0, 15.0)));

        assert_eq!(region.u, vec![2.0]);
        assert_eq!(region.time, field.time);
        assert_eq!(region.level, 500.0);
    }

    #[test]
    fn test_empty_selection() {
        let field = field_2x2();
        let region = extract_regional_data(&field, &LatLonRange::new((-10.0, 0.0), (0.0, 10.0)));

        assert!(region.is_empty());
        assert!(region.u.is_empty() && region.v.is_empty());
        assert!(region.lats.is_empty() && region.lons.is_empty());
        assert_eq!(region.shape.to_string(), "(0,)");
    }
}
