//! Named gridded records and the source abstraction that yields them.

use chrono::{DateTime, Utc};

use crate::WindResult;

/// Record name of the eastward wind component.
pub const U_COMPONENT: &str = "U component of wind";

/// Record name of the northward wind component.
pub const V_COMPONENT: &str = "V component of wind";

/// One decoded 2-D record: values plus the coordinates of every grid point.
///
/// Arrays are row-major with `rows * cols` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRecord {
    pub name: String,
    pub values: Vec<f32>,
    pub lats: Vec<f32>,
    pub lons: Vec<f32>,
    pub rows: usize,
    pub cols: usize,
    pub valid_time: DateTime<Utc>,
    pub level: f64,
}

/// Anything that can look up a gridded record by name.
///
/// Implementations return the first record carrying `name`, in whatever
/// order the underlying storage enumerates them, and fail with
/// [`WindError::DataNotFound`](crate::WindError::DataNotFound) when none does.
pub trait RecordSource {
    fn find_record(&mut self, name: &str) -> WindResult<GridRecord>;
}

impl<S: RecordSource + ?Sized> RecordSource for &mut S {
    fn find_record(&mut self, name: &str) -> WindResult<GridRecord> {
        (**self).find_record(name)
    }
}
