use std::path::PathBuf;

use thiserror::Error;
use wind_common::WindError;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Embedded font could not be loaded")]
    Font,

    #[error("Nothing to plot: field has no valid cells")]
    NothingToPlot,

    #[error("Figure of {width}x{height} pixels is too small")]
    FigureTooSmall { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<RenderError> for WindError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::NothingToPlot => WindError::EmptyField,
            other => WindError::Render(other.to_string()),
        }
    }
}
