//! File-backed record source for GRIB2 data.
//!
//! Section parsing, unpacking and grid point geometry are delegated to the
//! `grib` crate. This module only maps its submessages onto named
//! [`GridRecord`]s.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek};
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use grib::codetables::grib2::Table4_4;
use grib::{ForecastTime, Grib2, Grib2SubmessageDecoder, Name, SeekableGrib2Reader, SubMessage};
use tracing::{debug, info, warn, Level};
use wind_common::{GridRecord, RecordSource, WindError, WindResult};

use crate::tables::{Grib2Tables, ParamKey};

/// Fixed surface type for isobaric levels (GRIB2 Code Table 4.5).
const ISOBARIC_SURFACE: u8 = 100;

/// Summary of one submessage, for listing file contents.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageInfo {
    pub index: (usize, usize),
    pub parameter: String,
    pub level: String,
}

/// An open GRIB2 file.
///
/// The underlying reader is owned by this value and released when it is
/// dropped, whether or not a lookup succeeded.
pub struct Grib2File<R = BufReader<File>> {
    label: String,
    grib: Grib2<SeekableGrib2Reader<R>>,
    tables: Grib2Tables,
}

impl Grib2File {
    /// Open and index a GRIB2 file on disk.
    pub fn open(path: impl AsRef<Path>) -> WindResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => WindError::FileNotFound(path.to_path_buf()),
            _ => WindError::Io(e),
        })?;

        Self::from_reader(BufReader::new(file), path.display().to_string())
    }
}

impl<R: Read + Seek> Grib2File<R> {
    /// Index GRIB2 data from any seekable reader.
    pub fn from_reader(reader: R, label: impl Into<String>) -> WindResult<Self> {
        let label = label.into();
        let grib = grib::from_reader(reader)
            .map_err(|e| WindError::Grib2(format!("{}: {}", label, e)))?;

        info!(source = %label, submessages = grib.len(), "Opened GRIB2 data");

        let file = Self {
            label,
            grib,
            tables: Grib2Tables::wind(),
        };
        if tracing::enabled!(Level::DEBUG) {
            for message in file.messages() {
                debug!(
                    source = %file.label,
                    index = ?message.index,
                    parameter = %message.parameter,
                    level = %message.level,
                    "Indexed submessage"
                );
            }
        }

        Ok(file)
    }

    /// Parameter and level of every submessage, in file order.
    pub fn messages(&self) -> Vec<MessageInfo> {
        let mut messages = Vec::with_capacity(self.grib.len());
        for (index, submessage) in self.grib.iter() {
            let (discipline, category, number) = param_key(&submessage);
            let level = match submessage.prod_def().fixed_surfaces() {
                Some((first, _)) => self
                    .tables
                    .level_description(first.surface_type, level_value(&first)),
                None => "unknown level".to_string(),
            };
            messages.push(MessageInfo {
                index,
                parameter: self.tables.short_name(discipline, category, number),
                level,
            });
        }
        messages
    }

    /// Locate the first submessage carrying `key`, counting how many match.
    fn locate(&self, key: ParamKey) -> Option<((usize, usize), usize)> {
        let mut first = None;
        let mut count = 0;
        // Each SubMessage holds a mutable borrow of the reader, so every
        // item must be dropped before the iterator advances.
        for (index, submessage) in self.grib.iter() {
            if param_key(&submessage) == key {
                count += 1;
                if first.is_none() {
                    first = Some(index);
                }
            }
        }
        first.map(|index| (index, count))
    }
}

impl<R: Read + Seek> RecordSource for Grib2File<R> {
    fn find_record(&mut self, name: &str) -> WindResult<GridRecord> {
        let not_found = || WindError::DataNotFound {
            name: name.to_string(),
        };

        let key = self.tables.key_for_name(name).ok_or_else(not_found)?;
        let (index, count) = self.locate(key).ok_or_else(not_found)?;

        if count > 1 {
            // First match wins; the file order decides which level is used.
            debug!(
                source = %self.label,
                record = name,
                matches = count,
                selected = ?index,
                "Multiple records share this name, using the first"
            );
        }

        for (candidate, submessage) in self.grib.iter() {
            if candidate == index {
                return decode_record(name, submessage);
            }
        }

        Err(not_found())
    }
}

/// (discipline, category, number) of a submessage.
fn param_key<R>(submessage: &SubMessage<'_, R>) -> ParamKey {
    let prod_def = submessage.prod_def();
    (
        submessage.indicator().discipline,
        prod_def.parameter_category().unwrap_or(u8::MAX),
        prod_def.parameter_number().unwrap_or(u8::MAX),
    )
}

/// Level value as reported to users: isobaric surfaces in hPa, others raw.
fn level_value(surface: &grib::FixedSurface) -> f64 {
    let value = surface.value();
    if surface.surface_type == ISOBARIC_SURFACE {
        value / 100.0
    } else {
        value
    }
}

/// Decode values, coordinates and metadata of one submessage.
fn decode_record<R: grib::Grib2Read>(name: &str, submessage: SubMessage<'_, R>) -> WindResult<GridRecord> {
    let grib_err = |e: grib::GribError| WindError::Grib2(format!("{}: {}", name, e));

    let (cols, rows) = submessage.grid_shape().map_err(grib_err)?;

    let (lats, lons): (Vec<f32>, Vec<f32>) = submessage.latlons().map_err(grib_err)?.unzip();

    let valid_time = valid_time(&submessage)?;

    let level = match submessage.prod_def().fixed_surfaces() {
        Some((first, _)) => level_value(&first),
        None => {
            warn!(record = name, "Product definition has no fixed surface, reporting level 0");
            0.0
        }
    };

    let decoder = Grib2SubmessageDecoder::from(submessage).map_err(grib_err)?;
    let expected = rows * cols;
    // Bitmapped data yields one value per bitmap bit, padding included
    let values: Vec<f32> = decoder.dispatch().map_err(grib_err)?.take(expected).collect();

    for (field, len) in [("values", values.len()), ("lats", lats.len()), ("lons", lons.len())] {
        if len != expected {
            return Err(WindError::ShapeMismatch {
                field,
                expected,
                actual: len,
            });
        }
    }

    debug!(record = name, rows, cols, level, %valid_time, "Decoded GRIB2 record");

    Ok(GridRecord {
        name: name.to_string(),
        values,
        lats,
        lons,
        rows,
        cols,
        valid_time,
        level,
    })
}

/// Reference time plus forecast offset.
fn valid_time<R>(submessage: &SubMessage<'_, R>) -> WindResult<DateTime<Utc>> {
    let raw = submessage.identification().ref_time_unchecked();

    let reference = NaiveDate::from_ymd_opt(raw.year as i32, raw.month as u32, raw.day as u32)
        .and_then(|date| date.and_hms_opt(raw.hour as u32, raw.minute as u32, raw.second as u32))
        .ok_or_else(|| {
            WindError::Grib2(format!(
                "Invalid reference time: {}-{:02}-{:02} {:02}:{:02}:{:02}",
                raw.year, raw.month, raw.day, raw.hour, raw.minute, raw.second
            ))
        })?;
    let reference = DateTime::<Utc>::from_naive_utc_and_offset(reference, Utc);

    let offset = match submessage.prod_def().forecast_time() {
        Some(forecast) => forecast_offset(&forecast)?,
        None => Duration::zero(),
    };

    Ok(reference + offset)
}

/// Convert a forecast time to a duration.
pub fn forecast_offset(forecast: &ForecastTime) -> WindResult<Duration> {
    let value = forecast.value as i64;
    let offset = match forecast.unit {
        Name(Table4_4::Second) => Duration::seconds(value),
        Name(Table4_4::Minute) => Duration::minutes(value),
        Name(Table4_4::Hour) => Duration::hours(value),
        Name(Table4_4::ThreeHours) => Duration::hours(3 * value),
        Name(Table4_4::SixHours) => Duration::hours(6 * value),
        Name(Table4_4::TwelveHours) => Duration::hours(12 * value),
        Name(Table4_4::Day) => Duration::days(value),
        _ => {
            return Err(WindError::Grib2(format!(
                "Unsupported forecast time unit: {:?}",
                forecast.unit
            )))
        }
    };
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_offset_units() {
        let hours = ForecastTime::from_numbers(1, 6);
        assert_eq!(forecast_offset(&hours).unwrap(), Duration::hours(6));

        let minutes = ForecastTime::from_numbers(0, 90);
        assert_eq!(forecast_offset(&minutes).unwrap(), Duration::minutes(90));

        let three_hourly = ForecastTime::from_numbers(10, 2);
        assert_eq!(forecast_offset(&three_hourly).unwrap(), Duration::hours(6));
    }

    #[test]
    fn test_forecast_offset_rejects_calendar_units() {
        // Months have no fixed length
        let months = ForecastTime::from_numbers(3, 1);
        assert!(matches!(forecast_offset(&months), Err(WindError::Grib2(_))));
    }

    #[test]
    fn test_isobaric_level_in_hpa() {
        let surface = grib::FixedSurface::new(100, 0, 85000);
        assert_eq!(level_value(&surface), 850.0);

        let height = grib::FixedSurface::new(103, 0, 10);
        assert_eq!(level_value(&height), 10.0);
    }

    #[test]
    fn test_open_missing_file() {
        let err = Grib2File::open("/definitely/not/here.grb2").err().unwrap();
        assert!(matches!(err, WindError::FileNotFound(_)));
    }
}
