//! Loading the u/v wind components into a [`WindField`].

use std::path::Path;
use std::time::Instant;

use grib2_parser::Grib2File;
use tracing::{debug, info, warn};
use wind_common::{
    FieldShape, RecordSource, WindError, WindField, WindResult, U_COMPONENT, V_COMPONENT,
};

/// Build a wind field from the first U and V component records of `source`.
///
/// Coordinates, valid time and level come from the U record. The source is
/// consumed and dropped before this returns, on success and on failure.
pub fn load_wind_field<S: RecordSource>(mut source: S) -> WindResult<WindField> {
    let u = source.find_record(U_COMPONENT)?;
    let v = source.find_record(V_COMPONENT)?;
    drop(source);

    if (v.rows, v.cols) != (u.rows, u.cols) {
        return Err(WindError::ShapeMismatch {
            field: "v",
            expected: u.rows * u.cols,
            actual: v.rows * v.cols,
        });
    }

    if v.valid_time != u.valid_time || v.level != u.level {
        warn!(
            u_time = %u.valid_time,
            v_time = %v.valid_time,
            u_level = u.level,
            v_level = v.level,
            "U and V records differ in time or level, using U metadata"
        );
    }

    let shape = FieldShape::Grid {
        rows: u.rows,
        cols: u.cols,
    };
    debug!(%shape, level = u.level, time = %u.valid_time, "Assembled wind field");

    WindField::new(u.values, v.values, u.lats, u.lons, shape, u.valid_time, u.level)
}

/// Open a GRIB2 file and load its wind field.
///
/// Prints the `Reading:` progress line.
pub fn read_wind_data(path: impl AsRef<Path>) -> WindResult<WindField> {
    let path = path.as_ref();
    println!("Reading: {}", path.display());

    let start = Instant::now();
    let field = load_wind_field(Grib2File::open(path)?)?;

    info!(
        path = %path.display(),
        cells = field.len(),
        level = field.level,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Loaded wind field"
    );

    Ok(field)
}
