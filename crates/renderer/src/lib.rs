//! Static figures of wind fields.
//!
//! A figure combines:
//! - Filled speed bands (`YlOrRd`, blended over white)
//! - Wind arrows sampled on a stride, colored by speed (`Blues`)
//! - Axes, grid lines, title and a speed colorbar
//!
//! Figures are encoded as PNG by the in-house encoder in [`png`].

pub mod contour;
pub mod error;
pub mod gradient;
pub mod layout;
pub mod plot;
pub mod png;
pub mod quiver;
pub mod text;

pub use error::{RenderError, RenderResult};
pub use plot::{plot_title, plot_wind_field, render_plot, PlotConfig};
pub use quiver::{subsample_indices, QuiverConfig};
