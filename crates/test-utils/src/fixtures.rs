//! Pre-built record sources and regions for tests.

use std::cell::Cell;
use std::rc::Rc;

use wind_common::{GridRecord, LatLonRange, RecordSource, WindError, WindResult};

use crate::generators::{create_latlon_grid, grid_record};

/// Common selection regions.
pub mod regions {
    use wind_common::LatLonRange;

    /// Whole globe in the -180..180 convention
    pub const GLOBAL: LatLonRange = LatLonRange {
        lat_min: -90.0,
        lat_max: 90.0,
        lon_min: -180.0,
        lon_max: 180.0,
    };

    /// Europe, 35..70 N, 10 W..40 E
    pub const EUROPE: LatLonRange = LatLonRange::EUROPE;

    /// South Pacific, far from any synthetic test grid
    pub const SOUTH_PACIFIC: LatLonRange = LatLonRange {
        lat_min: -60.0,
        lat_max: -40.0,
        lon_min: -150.0,
        lon_max: -120.0,
    };
}

/// An in-memory [`RecordSource`].
///
/// Records are searched in insertion order, so duplicates behave like a
/// file holding the same parameter on several levels. Every lookup is
/// logged and dropping the source is observable through
/// [`MemoryRecordSource::drop_flag`].
#[derive(Debug, Default)]
pub struct MemoryRecordSource {
    records: Vec<GridRecord>,
    pub lookups: Vec<String>,
    dropped: Rc<Cell<bool>>,
}

impl MemoryRecordSource {
    pub fn new(records: Vec<GridRecord>) -> Self {
        Self {
            records,
            lookups: Vec::new(),
            dropped: Rc::new(Cell::new(false)),
        }
    }

    /// Shared flag set to `true` when this source is dropped.
    pub fn drop_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.dropped)
    }

    pub fn push(&mut self, record: GridRecord) {
        self.records.push(record);
    }
}

impl RecordSource for MemoryRecordSource {
    fn find_record(&mut self, name: &str) -> WindResult<GridRecord> {
        self.lookups.push(name.to_string());
        self.records
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| WindError::DataNotFound {
                name: name.to_string(),
            })
    }
}

impl Drop for MemoryRecordSource {
    fn drop(&mut self) {
        self.dropped.set(true);
    }
}

/// The 3x3 grid used throughout the statistics tests.
///
/// Rows are 10, 9 and 8 N; columns are 20, 21 and 22 E. The largest speed
/// (13 m/s, from a 5-12-13 triangle) sits at row 1, column 2.
pub fn known_3x3_records() -> (GridRecord, GridRecord) {
    let (lats, lons) = create_latlon_grid(3, 3, 10.0, 20.0, 1.0);
    let u = vec![0.0, 3.0, -3.0, 1.0, 0.0, 5.0, -1.0, 2.0, 0.0];
    let v = vec![0.0, 4.0, -4.0, 0.0, 1.0, 12.0, 0.0, 0.0, -2.0];
    (
        grid_record(wind_common::U_COMPONENT, u, lats.clone(), lons.clone(), 3, 3),
        grid_record(wind_common::V_COMPONENT, v, lats, lons, 3, 3),
    )
}

/// Speeds of [`known_3x3_records`] in row-major order.
pub const KNOWN_3X3_SPEEDS: [f32; 9] = [0.0, 5.0, 5.0, 1.0, 1.0, 13.0, 1.0, 2.0, 2.0];

/// A source holding the [`known_3x3_records`].
pub fn known_3x3_source() -> MemoryRecordSource {
    let (u, v) = known_3x3_records();
    MemoryRecordSource::new(vec![u, v])
}

/// Region covering exactly the middle row of [`known_3x3_records`].
pub fn middle_row_region() -> LatLonRange {
    LatLonRange::new((9.0, 9.0), (20.0, 22.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_speeds_match_components() {
        let (u, v) = known_3x3_records();
        for i in 0..9 {
            let speed = (u.values[i] * u.values[i] + v.values[i] * v.values[i]).sqrt();
            assert_eq!(speed, KNOWN_3X3_SPEEDS[i], "cell {i}");
        }
    }

    #[test]
    fn test_memory_source_logs_lookups() {
        let mut source = known_3x3_source();
        assert!(source.find_record(wind_common::U_COMPONENT).is_ok());
        assert!(matches!(
            source.find_record("Temperature"),
            Err(WindError::DataNotFound { .. })
        ));
        assert_eq!(source.lookups, vec![wind_common::U_COMPONENT, "Temperature"]);
    }

    #[test]
    fn test_drop_flag() {
        let source = MemoryRecordSource::default();
        let flag = source.drop_flag();
        assert!(!flag.get());
        drop(source);
        assert!(flag.get());
    }
}
