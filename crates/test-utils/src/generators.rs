//! Synthetic wind data with predictable structure.
//!
//! All grids are row-major, row 0 first. Latitude decreases with the row
//! index the way north-to-south model output is laid out.

use chrono::{DateTime, TimeZone, Utc};
use wind_common::{FieldShape, GridRecord, WindField, U_COMPONENT, V_COMPONENT};

/// Valid time used by every generated field: 2020-01-01 00:00 UTC.
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

/// Regular lat/lon coordinates for a `rows x cols` grid.
///
/// Row 0 sits at `lat_north`, column 0 at `lon_west`; both axes step by
/// `step` degrees. Returns `(lats, lons)` with one entry per cell.
///
/// # Example
///
/// ```
/// use test_utils::create_latlon_grid;
///
/// let (lats, lons) = create_latlon_grid(2, 3, 10.0, 20.0, 0.5);
/// assert_eq!(lats, vec![10.0, 10.0, 10.0, 9.5, 9.5, 9.5]);
/// assert_eq!(lons, vec![20.0, 20.5, 21.0, 20.0, 20.5, 21.0]);
/// ```
pub fn create_latlon_grid(
    rows: usize,
    cols: usize,
    lat_north: f32,
    lon_west: f32,
    step: f32,
) -> (Vec<f32>, Vec<f32>) {
    let mut lats = Vec::with_capacity(rows * cols);
    let mut lons = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            lats.push(lat_north - row as f32 * step);
            lons.push(lon_west + col as f32 * step);
        }
    }
    (lats, lons)
}

/// U component varying with the row, -20 m/s at the top to +20 m/s at the
/// bottom.
pub fn create_u_wind_grid(rows: usize, cols: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let lat_factor = (row as f32 / rows as f32 - 0.5) * 2.0; // -1 to 1
        data.extend(std::iter::repeat(lat_factor * 20.0).take(cols));
    }
    data
}

/// V component varying with the column, -15 m/s to +15 m/s west to east.
pub fn create_v_wind_grid(rows: usize, cols: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(rows * cols);
    for _row in 0..rows {
        for col in 0..cols {
            let lon_factor = (col as f32 / cols as f32 - 0.5) * 2.0; // -1 to 1
            data.push(lon_factor * 15.0);
        }
    }
    data
}

/// Cyclonic vortex centred on the grid: calm in the middle, tangential
/// speed growing linearly to `max_speed` at the corners.
///
/// Returns `(u, v)`.
pub fn create_vortex_grid(rows: usize, cols: usize, max_speed: f32) -> (Vec<f32>, Vec<f32>) {
    let center_x = (cols as f32 - 1.0) / 2.0;
    let center_y = (rows as f32 - 1.0) / 2.0;
    let max_dist = (center_x * center_x + center_y * center_y).sqrt().max(1.0);

    let mut u = Vec::with_capacity(rows * cols);
    let mut v = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let dx = col as f32 - center_x;
            // Rows grow southward, so flip to get a northward y axis
            let dy = center_y - row as f32;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist == 0.0 {
                u.push(0.0);
                v.push(0.0);
                continue;
            }
            let speed = dist / max_dist * max_speed;
            // Counter-clockwise tangent
            u.push(-dy / dist * speed);
            v.push(dx / dist * speed);
        }
    }
    (u, v)
}

/// Sets the given flat indices of `data` to NaN.
pub fn with_nans(mut data: Vec<f32>, indices: &[usize]) -> Vec<f32> {
    for &i in indices {
        if let Some(cell) = data.get_mut(i) {
            *cell = f32::NAN;
        }
    }
    data
}

/// A complete grid-shaped wind field over a regular lat/lon grid.
///
/// Uses [`create_u_wind_grid`] and [`create_v_wind_grid`] for the
/// components, 850 hPa and [`reference_time`].
pub fn synthetic_wind_field(
    rows: usize,
    cols: usize,
    lat_north: f32,
    lon_west: f32,
    step: f32,
) -> WindField {
    let (lats, lons) = create_latlon_grid(rows, cols, lat_north, lon_west, step);
    WindField {
        u: create_u_wind_grid(rows, cols),
        v: create_v_wind_grid(rows, cols),
        lats,
        lons,
        shape: FieldShape::Grid { rows, cols },
        time: reference_time(),
        level: 850.0,
    }
}

/// A [`GridRecord`] named `name` over the given coordinates.
pub fn grid_record(name: &str, values: Vec<f32>, lats: Vec<f32>, lons: Vec<f32>, rows: usize, cols: usize) -> GridRecord {
    GridRecord {
        name: name.to_string(),
        values,
        lats,
        lons,
        rows,
        cols,
        valid_time: reference_time(),
        level: 850.0,
    }
}

/// U and V records matching [`synthetic_wind_field`] with the same arguments.
pub fn synthetic_wind_records(
    rows: usize,
    cols: usize,
    lat_north: f32,
    lon_west: f32,
    step: f32,
) -> (GridRecord, GridRecord) {
    let field = synthetic_wind_field(rows, cols, lat_north, lon_west, step);
    (
        grid_record(U_COMPONENT, field.u, field.lats.clone(), field.lons.clone(), rows, cols),
        grid_record(V_COMPONENT, field.v, field.lats, field.lons, rows, cols),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u_wind_varies_by_row() {
        let grid = create_u_wind_grid(4, 3);
        assert_eq!(grid.len(), 12);
        assert_eq!(grid[0], -20.0);
        assert_eq!(grid[0], grid[2]);
        assert_eq!(grid[3], -10.0);
    }

    #[test]
    fn test_v_wind_varies_by_column() {
        let grid = create_v_wind_grid(2, 4);
        assert_eq!(grid[0], -15.0);
        assert_eq!(grid[2], 0.0);
        assert_eq!(grid[0], grid[4]);
    }

    #[test]
    fn test_vortex_is_calm_at_center() {
        let (u, v) = create_vortex_grid(5, 5, 10.0);
        assert_eq!(u[12], 0.0);
        assert_eq!(v[12], 0.0);

        // Corner speed reaches the maximum
        let corner = (u[0] * u[0] + v[0] * v[0]).sqrt();
        assert!((corner - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_with_nans_ignores_out_of_range() {
        let data = with_nans(vec![1.0, 2.0, 3.0], &[1, 7]);
        assert!(data[1].is_nan());
        assert_eq!(data[0], 1.0);
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_synthetic_field_is_consistent() {
        let field = synthetic_wind_field(3, 4, 60.0, 0.0, 1.0);
        assert_eq!(field.shape.len(), 12);
        assert_eq!(field.u.len(), 12);
        assert_eq!(field.lats[4], 59.0);
        assert_eq!(field.lons[4], 0.0);

        let (u, v) = synthetic_wind_records(3, 4, 60.0, 0.0, 1.0);
        assert_eq!(u.name, U_COMPONENT);
        assert_eq!(v.values, field.v);
    }
}
