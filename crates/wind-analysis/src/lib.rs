//! Wind field analysis.
//!
//! The pipeline is linear: [`load_wind_field`] pulls the two components out
//! of a [`RecordSource`](wind_common::RecordSource), [`calculate_wind_stats`]
//! derives speed and direction, [`summarize`] reduces a field to the
//! statistics printed by the command line tool and
//! [`extract_regional_data`] filters a field to a lat/lon box.

pub mod loader;
pub mod region;
pub mod stats;
pub mod summary;

pub use loader::{load_wind_field, read_wind_data};
pub use region::extract_regional_data;
pub use stats::{calculate_wind_stats, wind_direction, wind_speed};
pub use summary::{analyze_wind_data, summarize, ComponentStats, MaxLocation, SpeedStats, WindSummary};
