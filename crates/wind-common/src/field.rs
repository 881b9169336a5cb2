//! Wind field snapshot: u/v components on a shared coordinate grid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{WindError, WindResult};

/// Layout of the arrays in a [`WindField`].
///
/// Grid fields keep the 2-D structure of the source record in row-major
/// order. Regional extraction drops that structure and yields a flat list
/// of selected cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldShape {
    Grid { rows: usize, cols: usize },
    Flat(usize),
}

impl FieldShape {
    /// Total number of cells.
    pub fn len(&self) -> usize {
        match *self {
            FieldShape::Grid { rows, cols } => rows * cols,
            FieldShape::Flat(n) => n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert a flat index to `(row, col)`. Flat fields report row 0.
    pub fn unravel(&self, index: usize) -> (usize, usize) {
        match *self {
            FieldShape::Grid { cols, .. } if cols > 0 => (index / cols, index % cols),
            _ => (0, index),
        }
    }
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldShape::Grid { rows, cols } => write!(f, "({}, {})", rows, cols),
            FieldShape::Flat(n) => write!(f, "({},)", n),
        }
    }
}

/// A single-time, single-level snapshot of the horizontal wind.
///
/// All four arrays share `shape` and are indexed identically: cell `i` has
/// components `u[i]`, `v[i]` at `(lats[i], lons[i])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindField {
    /// Eastward component (m/s)
    pub u: Vec<f32>,
    /// Northward component (m/s)
    pub v: Vec<f32>,
    /// Latitude of each cell (degrees)
    pub lats: Vec<f32>,
    /// Longitude of each cell (degrees)
    pub lons: Vec<f32>,
    pub shape: FieldShape,
    /// Valid time of the data
    pub time: DateTime<Utc>,
    /// Vertical level (hPa for isobaric surfaces)
    pub level: f64,
}

impl WindField {
    /// Build a field, checking that every array matches `shape`.
    pub fn new(
        u: Vec<f32>,
        v: Vec<f32>,
        lats: Vec<f32>,
        lons: Vec<f32>,
        shape: FieldShape,
        time: DateTime<Utc>,
        level: f64,
    ) -> WindResult<Self> {
        let expected = shape.len();
        for (field, len) in [
            ("u", u.len()),
            ("v", v.len()),
            ("lats", lats.len()),
            ("lons", lons.len()),
        ] {
            if len != expected {
                return Err(WindError::ShapeMismatch {
                    field,
                    expected,
                    actual: len,
                });
            }
        }

        Ok(Self {
            u,
            v,
            lats,
            lons,
            shape,
            time,
            level,
        })
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    /// `(lat, lon)` of the cell at a flat index.
    pub fn coord(&self, index: usize) -> Option<(f32, f32)> {
        Some((*self.lats.get(index)?, *self.lons.get(index)?))
    }

    /// Valid time formatted the way the console and plot title show it.
    pub fn time_label(&self) -> String {
        self.time.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
