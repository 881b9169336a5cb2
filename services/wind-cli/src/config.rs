//! Command line and environment configuration.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use renderer::plot::{DEFAULT_CONTOUR_LEVELS, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use renderer::quiver::DEFAULT_QUIVER_STRIDE;
use renderer::PlotConfig;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use wind_common::{LatLonRange, RangeParseError};

#[derive(Parser, Debug)]
#[command(name = "wind-analyzer")]
#[command(about = "Wind statistics and plot from the U/V components of a GRIB2 file")]
pub struct Args {
    /// GRIB2 file holding "U component of wind" and "V component of wind"
    pub grib_file: Option<PathBuf>,

    /// Directory for the `<stem>_plot.png` output
    #[arg(long, env = "WIND_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Also summarize a sub-region: "lat_min,lat_max,lon_min,lon_max" or "europe"
    #[arg(long, env = "WIND_REGION", value_parser = parse_region, allow_hyphen_values = true)]
    pub region: Option<LatLonRange>,

    /// Draw an arrow every N rows and columns
    #[arg(long, env = "WIND_QUIVER_STRIDE", default_value_t = DEFAULT_QUIVER_STRIDE)]
    pub stride: usize,

    /// Number of filled speed bands
    #[arg(long, env = "WIND_CONTOUR_LEVELS", default_value_t = DEFAULT_CONTOUR_LEVELS)]
    pub levels: usize,

    /// Figure width in pixels
    #[arg(long, env = "WIND_PLOT_WIDTH", default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, env = "WIND_PLOT_HEIGHT", default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Skip rendering the plot
    #[arg(long, env = "WIND_NO_PLOT")]
    pub no_plot: bool,

    /// Log level
    #[arg(long, env = "WIND_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "WIND_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Args {
    pub fn plot_config(&self) -> PlotConfig {
        PlotConfig::default()
            .with_size(self.width, self.height)
            .with_stride(self.stride)
            .with_levels(self.levels)
    }
}

fn parse_region(s: &str) -> Result<LatLonRange, RangeParseError> {
    if s.eq_ignore_ascii_case("europe") {
        Ok(LatLonRange::EUROPE)
    } else {
        s.parse()
    }
}

/// Install the global tracing subscriber; logs go to stderr so stdout only
/// carries the report.
pub fn init_tracing(args: &Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    match args.log_format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
    }
    Ok(())
}
