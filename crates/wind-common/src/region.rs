//! Latitude/longitude selection ranges.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Closed latitude and longitude intervals, in degrees.
///
/// Both ends are inclusive. Longitudes are compared as given; no wrapping
/// between the 0..360 and -180..180 conventions is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonRange {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl LatLonRange {
    /// Europe, as used by the example regional analysis.
    pub const EUROPE: LatLonRange = LatLonRange {
        lat_min: 35.0,
        lat_max: 70.0,
        lon_min: -10.0,
        lon_max: 40.0,
    };

    pub fn new(lat_range: (f64, f64), lon_range: (f64, f64)) -> Self {
        Self {
            lat_min: lat_range.0,
            lat_max: lat_range.1,
            lon_min: lon_range.0,
            lon_max: lon_range.1,
        }
    }

    /// Whether `(lat, lon)` lies inside both intervals.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }
}

/// Parse "lat_min,lat_max,lon_min,lon_max"
impl FromStr for LatLonRange {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(RangeParseError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| RangeParseError::InvalidNumber(part.to_string()))?;
        }

        let [lat_min, lat_max, lon_min, lon_max] = values;
        if lat_min > lat_max {
            return Err(RangeParseError::Inverted("latitude", lat_min, lat_max));
        }
        if lon_min > lon_max {
            return Err(RangeParseError::Inverted("longitude", lon_min, lon_max));
        }

        Ok(Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RangeParseError {
    #[error("Invalid region format, expected lat_min,lat_max,lon_min,lon_max: {0}")]
    InvalidFormat(String),
    #[error("Invalid number in region: {0}")]
    InvalidNumber(String),
    #[error("Invalid {0} interval: {1} > {2}")]
    Inverted(&'static str, f64, f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_region() {
        let range: LatLonRange = "35, 70, -10, 40".parse().unwrap();
        assert_eq!(range, LatLonRange::EUROPE);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            "1,2,3".parse::<LatLonRange>(),
            Err(RangeParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            "1,2,x,4".parse::<LatLonRange>(),
            Err(RangeParseError::InvalidNumber(_))
        ));
        assert!(matches!(
            "10,0,0,10".parse::<LatLonRange>(),
            Err(RangeParseError::Inverted("latitude", _, _))
        ));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = LatLonRange::new((0.0, 10.0), (20.0, 30.0));
        assert!(range.contains(0.0, 20.0));
        assert!(range.contains(10.0, 30.0));
        assert!(range.contains(5.0, 25.0));
        assert!(!range.contains(10.01, 25.0));
        assert!(!range.contains(5.0, 19.99));
    }
}
