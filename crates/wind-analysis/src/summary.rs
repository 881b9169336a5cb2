//! Descriptive statistics of a wind field.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use wind_common::{FieldShape, WindError, WindField, WindResult};

use crate::stats::calculate_wind_stats;

/// Width of the `=` rules framing the console summary.
const RULE_WIDTH: usize = 50;

/// Min/max/mean/std of wind speed (m/s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
}

/// Min/max/mean of one wind component (m/s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// The cell with the highest wind speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaxLocation {
    /// Flat row-major index
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub speed: f64,
    pub lat: f64,
    pub lon: f64,
}

/// Everything the analysis report shows.
///
/// `Display` renders the fixed console block; `Serialize` gives the same
/// numbers as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindSummary {
    pub time: DateTime<Utc>,
    pub level: f64,
    pub shape: FieldShape,
    /// Cells that contributed to the statistics (missing values excluded)
    pub valid_cells: usize,
    pub speed: SpeedStats,
    pub u: ComponentStats,
    pub v: ComponentStats,
    pub max_location: MaxLocation,
}

/// Running aggregate over the non-NaN values of a series.
#[derive(Debug, Default)]
struct Moments {
    count: usize,
    min: f64,
    max: f64,
    sum: f64,
    sum_sq: f64,
}

impl Moments {
    fn from_values(values: &[f32]) -> Self {
        let mut m = Moments {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            ..Default::default()
        };
        for &value in values {
            if value.is_nan() {
                continue;
            }
            let value = f64::from(value);
            m.count += 1;
            m.min = m.min.min(value);
            m.max = m.max.max(value);
            m.sum += value;
            m.sum_sq += value * value;
        }
        m
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }

    fn std(&self) -> f64 {
        let mean = self.mean();
        // Guard against tiny negative variance from cancellation
        (self.sum_sq / self.count as f64 - mean * mean).max(0.0).sqrt()
    }

    fn component(&self) -> ComponentStats {
        ComponentStats {
            min: self.min,
            max: self.max,
            mean: self.mean(),
        }
    }
}

/// Index of the first maximum in row-major order, skipping NaN.
fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}

/// Compute the summary statistics of a field.
///
/// Missing values (NaN) are skipped. Fails with [`WindError::EmptyField`]
/// when the field has no cells or no cell has a defined speed.
pub fn summarize(field: &WindField) -> WindResult<WindSummary> {
    if field.is_empty() {
        return Err(WindError::EmptyField);
    }

    let (speed, _direction) = calculate_wind_stats(&field.u, &field.v);

    let speed_moments = Moments::from_values(&speed);
    if speed_moments.count == 0 {
        return Err(WindError::EmptyField);
    }

    let index = argmax(&speed).ok_or(WindError::EmptyField)?;
    let (lat, lon) = field.coord(index).ok_or(WindError::ShapeMismatch {
        field: "lats",
        expected: field.len(),
        actual: field.lats.len().min(field.lons.len()),
    })?;
    let (row, col) = field.shape.unravel(index);

    Ok(WindSummary {
        time: field.time,
        level: field.level,
        shape: field.shape,
        valid_cells: speed_moments.count,
        speed: SpeedStats {
            min: speed_moments.min,
            max: speed_moments.max,
            mean: speed_moments.mean(),
            std: speed_moments.std(),
        },
        u: Moments::from_values(&field.u).component(),
        v: Moments::from_values(&field.v).component(),
        max_location: MaxLocation {
            index,
            row,
            col,
            speed: f64::from(speed[index]),
            lat: f64::from(lat),
            lon: f64::from(lon),
        },
    })
}

/// Summarize a field and print the report to stdout.
pub fn analyze_wind_data(field: &WindField) -> WindResult<WindSummary> {
    let summary = summarize(field)?;
    println!("{}", summary);
    Ok(summary)
}

impl fmt::Display for WindSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f)?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Wind Data Analysis")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Time: {}", self.time.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Level: {}", self.level)?;
        writeln!(f, "Grid size: {}", self.shape)?;

        writeln!(f, "\nWind Speed Statistics (m/s):")?;
        writeln!(f, "  Min:  {:.2}", self.speed.min)?;
        writeln!(f, "  Max:  {:.2}", self.speed.max)?;
        writeln!(f, "  Mean: {:.2}", self.speed.mean)?;
        writeln!(f, "  Std:  {:.2}", self.speed.std)?;

        for (label, stats) in [("U", &self.u), ("V", &self.v)] {
            writeln!(f, "\n{}-component Statistics (m/s):", label)?;
            writeln!(f, "  Min:  {:.2}", stats.min)?;
            writeln!(f, "  Max:  {:.2}", stats.max)?;
            writeln!(f, "  Mean: {:.2}", stats.mean)?;
        }

        writeln!(f, "\nMaximum wind speed location:")?;
        writeln!(f, "  Speed: {:.2} m/s", self.max_location.speed)?;
        writeln!(f, "  Lat: {:.2}°", self.max_location.lat)?;
        writeln!(f, "  Lon: {:.2}°", self.max_location.lon)?;
        writeln!(f, "{}", rule)
    }
}
