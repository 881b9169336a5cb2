//! Wind field analyzer.
//!
//! Reads the U and V wind components from a GRIB2 file, prints summary
//! statistics and writes a contour + vector plot next to the other outputs.

mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use wind_analysis::{analyze_wind_data, extract_regional_data, read_wind_data};
use wind_common::WindError;

use config::{init_tracing, Args};

const USAGE: &str = "Usage: wind-analyzer <grib_file>\nExample: wind-analyzer wind_gfs_20200101_00.grb2";

fn main() -> Result<ExitCode> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args)?;

    match run(&args) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => match err.downcast_ref::<WindError>() {
            Some(WindError::Usage(usage)) => {
                println!("{}", usage);
                Ok(ExitCode::FAILURE)
            }
            Some(e @ WindError::FileNotFound(_)) => {
                println!("Error: {}", e);
                Ok(ExitCode::FAILURE)
            }
            _ => Err(err),
        },
    }
}

fn run(args: &Args) -> Result<()> {
    let grib_file = args
        .grib_file
        .as_deref()
        .ok_or_else(|| WindError::Usage(USAGE.to_string()))?;

    if !grib_file.exists() {
        return Err(WindError::FileNotFound(grib_file.to_path_buf()).into());
    }

    let field = read_wind_data(grib_file)?;
    analyze_wind_data(&field)?;

    if let Some(region) = &args.region {
        let regional = extract_regional_data(&field, region);
        match analyze_wind_data(&regional) {
            Ok(_) => {}
            Err(WindError::EmptyField) => warn!(?region, "Region contains no grid cells"),
            Err(e) => return Err(e.into()),
        }
    }

    if args.no_plot {
        info!("Plot disabled");
    } else {
        let output = plot_path(&args.output_dir, grib_file);
        renderer::plot_wind_field(&field, &output, &args.plot_config())
            .map_err(WindError::from)
            .with_context(|| format!("Failed to plot {}", grib_file.display()))?;
    }

    println!("✓ Processing complete!");
    Ok(())
}

/// `<output_dir>/<input stem>_plot.png`
fn plot_path(output_dir: &Path, grib_file: &Path) -> PathBuf {
    let stem = grib_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "wind".to_string());
    output_dir.join(format!("{}_plot.png", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_path_uses_stem() {
        assert_eq!(
            plot_path(Path::new("."), Path::new("/data/wind_gfs_20200101_00.grb2")),
            PathBuf::from("./wind_gfs_20200101_00_plot.png")
        );
        assert_eq!(
            plot_path(Path::new("out"), Path::new("archive.tar.grib2")),
            PathBuf::from("out/archive.tar_plot.png")
        );
    }

    #[test]
    fn test_missing_argument_is_usage_error() {
        let args = Args::try_parse_from(["wind-analyzer"]).unwrap();
        let err = run(&args).unwrap_err();
        assert!(matches!(err.downcast_ref::<WindError>(), Some(WindError::Usage(_))));
    }

    #[test]
    fn test_missing_file_is_not_found_error() {
        let args = Args::try_parse_from(["wind-analyzer", "/no/such/file.grb2"]).unwrap();
        let err = run(&args).unwrap_err();
        assert!(matches!(err.downcast_ref::<WindError>(), Some(WindError::FileNotFound(_))));
    }
}
