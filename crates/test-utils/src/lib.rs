//! Test support shared by the wind-analyzer crates.
//!
//! - [`paths`]: locating optional GRIB2 samples and scratch directories
//! - [`generators`]: synthetic lat/lon grids and wind fields
//! - [`fixtures`]: hand-checked 3x3 records and an in-memory record source
//! - [`grib2`]: [`Grib2Builder`] for small on-the-fly GRIB2 messages

pub mod fixtures;
pub mod generators;
pub mod grib2;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use grib2::Grib2Builder;
pub use paths::*;

/// Path of a named sample file, or return from the calling test.
///
/// Real GRIB2 samples are not checked in. When the file cannot be found
/// under `TEST_DATA_DIR` or one of the `testdata/` directories the test
/// logs a skip line and passes.
///
/// ```ignore
/// let path = require_test_file!("gfs_wind_sample.grb2");
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!("skipping: sample '{}' not available (set TEST_DATA_DIR)", $name);
                return;
            }
        }
    }};
}

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for comparing compass bearings in degrees, treating 0 and 360 as
/// the same direction.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_bearing_eq;
///
/// assert_bearing_eq!(359.9995_f32, 0.0_f32, 0.001); // passes
/// ```
#[macro_export]
macro_rules! assert_bearing_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).rem_euclid(360.0);
        let diff = diff.min(360.0 - diff);
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)` bearings\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_bearing_eq_wraps() {
        assert_bearing_eq!(359.9995, 0.0, 0.001);
        assert_bearing_eq!(0.0005, 360.0, 0.001);
        assert_bearing_eq!(90.0, 90.0, 0.0);
    }

    #[test]
    #[should_panic(expected = "bearings")]
    fn test_assert_bearing_eq_fails() {
        assert_bearing_eq!(10.0, 350.0, 1.0);
    }
}
