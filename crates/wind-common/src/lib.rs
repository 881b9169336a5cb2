//! Common types shared across the wind analysis workspace.

pub mod error;
pub mod field;
pub mod record;
pub mod region;

pub use error::{WindError, WindResult};
pub use field::{FieldShape, WindField};
pub use record::{GridRecord, RecordSource, U_COMPONENT, V_COMPONENT};
pub use region::{LatLonRange, RangeParseError};
