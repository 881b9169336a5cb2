//! Error types for wind data processing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using WindError.
pub type WindResult<T> = Result<T, WindError>;

/// Primary error type for loading, analyzing and rendering wind data.
#[derive(Debug, Error)]
pub enum WindError {
    // === Invocation Errors ===
    #[error("{0}")]
    Usage(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    // === Data Errors ===
    #[error("No record found for '{name}'")]
    DataNotFound { name: String },

    #[error("Shape mismatch for {field}: expected {expected} points, got {actual}")]
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Wind field is empty")]
    EmptyField,

    #[error("Invalid GRIB2 data: {0}")]
    Grib2(String),

    // === Output Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WindError {
    /// Whether the error is an invocation problem the binary reports with a
    /// short message and exit code 1 rather than a full error chain.
    pub fn is_invocation_error(&self) -> bool {
        matches!(self, WindError::Usage(_) | WindError::FileNotFound(_))
    }
}
