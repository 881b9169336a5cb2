//! Property tests for the speed/direction conversion and region filter.

use proptest::prelude::*;
use test_utils::{assert_bearing_eq, synthetic_wind_field};
use wind_analysis::{calculate_wind_stats, extract_regional_data, wind_direction, wind_speed};
use wind_common::LatLonRange;

proptest! {
    #[test]
    fn speed_is_euclidean_norm(u in -500.0f32..500.0, v in -500.0f32..500.0) {
        let speed = wind_speed(u, v);
        let expected = f64::from(u).hypot(f64::from(v));
        prop_assert!(speed >= 0.0);
        prop_assert!((f64::from(speed) - expected).abs() <= expected * 1e-6 + 1e-6);
    }

    #[test]
    fn direction_is_in_range(u in -500.0f32..500.0, v in -500.0f32..500.0) {
        let direction = wind_direction(u, v);
        prop_assert!((0.0..360.0).contains(&direction), "direction {}", direction);
    }

    #[test]
    fn direction_points_upwind(u in -100.0f32..100.0, v in -100.0f32..100.0) {
        prop_assume!(wind_speed(u, v) > 0.1);
        // Unit vector toward the source of the wind
        let theta = f64::from(wind_direction(u, v)).to_radians();
        let (east, north) = (theta.sin(), theta.cos());
        let speed = f64::from(wind_speed(u, v));
        prop_assert!((east + f64::from(u) / speed).abs() < 1e-4);
        prop_assert!((north + f64::from(v) / speed).abs() < 1e-4);
    }

    #[test]
    fn full_region_keeps_every_cell(rows in 1usize..12, cols in 1usize..12) {
        let field = synthetic_wind_field(rows, cols, 60.0, -5.0, 0.5);
        let region = extract_regional_data(&field, &LatLonRange::new((-90.0, 90.0), (-180.0, 360.0)));

        prop_assert_eq!(region.len(), field.len());
        prop_assert_eq!(&region.u, &field.u);
        prop_assert_eq!(&region.v, &field.v);
        prop_assert_eq!(&region.lats, &field.lats);
        prop_assert_eq!(&region.lons, &field.lons);
    }

    #[test]
    fn region_cells_lie_inside(
        lat_lo in 50.0f64..60.0,
        lat_span in 0.0f64..10.0,
        lon_lo in -5.0f64..0.0,
        lon_span in 0.0f64..5.0,
    ) {
        let field = synthetic_wind_field(20, 10, 60.0, -5.0, 0.5);
        let range = LatLonRange::new((lat_lo, lat_lo + lat_span), (lon_lo, lon_lo + lon_span));
        let region = extract_regional_data(&field, &range);

        prop_assert_eq!(region.u.len(), region.len());
        for (lat, lon) in region.lats.iter().zip(&region.lons) {
            prop_assert!(range.contains(f64::from(*lat), f64::from(*lon)));
        }
        let expected = field
            .lats
            .iter()
            .zip(&field.lons)
            .filter(|(lat, lon)| range.contains(f64::from(**lat), f64::from(**lon)))
            .count();
        prop_assert_eq!(region.len(), expected);
    }
}

#[test]
fn test_known_vectors() {
    let (speed, direction) = calculate_wind_stats(
        &[0.0, -10.0, 0.0, 10.0],
        &[-10.0, 0.0, 10.0, 0.0],
    );

    assert!(speed.iter().all(|&s| s == 10.0));
    assert_bearing_eq!(direction[0], 0.0, 1e-4);
    assert_bearing_eq!(direction[1], 90.0, 1e-4);
    assert_bearing_eq!(direction[2], 180.0, 1e-4);
    assert_bearing_eq!(direction[3], 270.0, 1e-4);
}

#[test]
fn test_calm_air_points_north() {
    assert_eq!(wind_direction(0.0, 0.0), 0.0);
    assert_eq!(wind_speed(0.0, 0.0), 0.0);
}
