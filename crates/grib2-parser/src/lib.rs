//! GRIB2 access for wind analysis (WMO FM 92 GRIB Edition 2).
//!
//! Decoding is done by the `grib` crate; this crate adds name-based record
//! lookup on top of it through [`wind_common::RecordSource`].

pub mod reader;
pub mod tables;

pub use reader::{Grib2File, MessageInfo};
pub use tables::{Grib2Tables, LevelDescription, ParamKey, ParameterName};
