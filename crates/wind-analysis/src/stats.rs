//! Speed and meteorological direction from u/v components.

/// Magnitude of the horizontal wind vector (m/s).
#[inline]
pub fn wind_speed(u: f32, v: f32) -> f32 {
    (u * u + v * v).sqrt()
}

/// Direction the wind blows *from*, in degrees clockwise from north, in
/// `[0, 360)`.
///
/// Calm air (`u == v == 0`) reports 0.
#[inline]
pub fn wind_direction(u: f32, v: f32) -> f32 {
    // Adding 0.0 turns -0.0 into +0.0 so atan2 does not land on 180 for calm air
    let degrees = (-u + 0.0).atan2(-v + 0.0).to_degrees();
    let normalized = (degrees + 360.0) % 360.0;
    // f32 rounding can push tiny negative angles up to exactly 360
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Elementwise speed and direction of two equally long component arrays.
///
/// Returns `(speed, direction)`, each the length of the shorter input.
pub fn calculate_wind_stats(u: &[f32], v: &[f32]) -> (Vec<f32>, Vec<f32>) {
    u.iter()
        .zip(v)
        .map(|(&u, &v)| (wind_speed(u, v), wind_direction(u, v)))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_cardinal_directions() {
        // Wind from the south blows northward
        assert_eq!(wind_direction(0.0, -10.0), 0.0);
        assert_close(wind_direction(-10.0, 0.0), 90.0);
        assert_close(wind_direction(0.0, 10.0), 180.0);
        assert_close(wind_direction(10.0, 0.0), 270.0);
    }

    #[test]
    fn test_calm_wind() {
        assert_eq!(wind_speed(0.0, 0.0), 0.0);
        assert_eq!(wind_direction(0.0, 0.0), 0.0);
        assert_eq!(wind_direction(-0.0, -0.0), 0.0);
    }

    #[test]
    fn test_diagonal() {
        // South-westerly: blowing toward the north-east
        assert_close(wind_direction(5.0, 5.0), 225.0);
        assert!((wind_speed(3.0, 4.0) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_stats_arrays() {
        let (speed, direction) = calculate_wind_stats(&[0.0, -10.0, 3.0], &[-10.0, 0.0, 4.0]);
        assert_eq!(speed, vec![10.0, 10.0, 5.0]);
        assert_eq!(direction[0], 0.0);
        assert_close(direction[1], 90.0);
        assert_eq!(direction.len(), 3);
    }

    #[test]
    fn test_nan_propagates() {
        let (speed, _) = calculate_wind_stats(&[f32::NAN], &[1.0]);
        assert!(speed[0].is_nan());
    }
}
