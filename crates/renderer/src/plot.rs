//! Full wind field figure: banded speed background, subsampled arrows,
//! axes, title and colorbar.

use std::path::Path;
use std::time::Instant;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use tracing::{debug, info};
use wind_analysis::calculate_wind_stats;
use wind_common::{FieldShape, WindField};

use crate::contour::{band_colors, band_levels, fill_grid, fill_points};
use crate::error::{RenderError, RenderResult};
use crate::gradient::{Color, BLUES, YL_OR_RD};
use crate::layout::{format_tick, nice_ticks, PlotArea};
use crate::png::write_png;
use crate::quiver::{build_arrows, draw_arrows, subsample_indices, QuiverConfig};
use crate::text::TextRenderer;

/// 14 x 8 inches at 150 dpi
pub const DEFAULT_WIDTH: u32 = 2100;
pub const DEFAULT_HEIGHT: u32 = 1200;
pub const DEFAULT_CONTOUR_LEVELS: usize = 20;
pub const CONTOUR_ALPHA: f32 = 0.7;
pub const GRID_ALPHA: f32 = 0.3;

const MARGIN_LEFT: u32 = 110;
const MARGIN_RIGHT: u32 = 190;
const MARGIN_TOP: u32 = 70;
const MARGIN_BOTTOM: u32 = 90;
const MIN_PLOT_SIZE: u32 = 100;

const COLORBAR_GAP: u32 = 30;
const COLORBAR_WIDTH: u32 = 28;

const TITLE_SIZE: f32 = 30.0;
const LABEL_SIZE: f32 = 24.0;
const TICK_SIZE: f32 = 18.0;
const TICK_LENGTH: i32 = 8;

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const GRID_COLOR: Color = Color::rgb(0xb0, 0xb0, 0xb0);

/// Figure options
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    /// Number of equal-width speed bands
    pub levels: usize,
    /// Opacity of the speed bands over the white canvas
    pub alpha: f32,
    pub quiver: QuiverConfig,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            levels: DEFAULT_CONTOUR_LEVELS,
            alpha: CONTOUR_ALPHA,
            quiver: QuiverConfig::default(),
        }
    }
}

impl PlotConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.quiver.stride = stride;
        self
    }

    pub fn with_levels(mut self, levels: usize) -> Self {
        self.levels = levels;
        self
    }
}

/// Figure title for a field.
pub fn plot_title(field: &WindField) -> String {
    format!("Wind Field - {} - Level: {}", field.time_label(), field.level)
}

/// Render the figure in memory.
pub fn render_plot(field: &WindField, config: &PlotConfig) -> RenderResult<RgbaImage> {
    let plot_width = config.width.saturating_sub(MARGIN_LEFT + MARGIN_RIGHT);
    let plot_height = config.height.saturating_sub(MARGIN_TOP + MARGIN_BOTTOM);
    if plot_width < MIN_PLOT_SIZE || plot_height < MIN_PLOT_SIZE {
        return Err(RenderError::FigureTooSmall {
            width: config.width,
            height: config.height,
        });
    }

    let (speed, _) = calculate_wind_stats(&field.u, &field.v);
    let (min, max) = finite_range(&speed).ok_or(RenderError::NothingToPlot)?;
    let area = PlotArea::fit(MARGIN_LEFT, MARGIN_TOP, plot_width, plot_height, &field.lats, &field.lons)
        .ok_or(RenderError::NothingToPlot)?;
    let text = TextRenderer::new()?;

    let mut img = RgbaImage::from_pixel(config.width, config.height, Color::WHITE.to_rgba());

    let levels = band_levels(min, max, config.levels.max(1));
    let colors = band_colors(&YL_OR_RD, levels.len().saturating_sub(1), config.alpha);

    match field.shape {
        FieldShape::Grid { rows, cols } if rows >= 2 && cols >= 2 => {
            fill_grid(&mut img, &area, &speed, &field.lats, &field.lons, rows, cols, &levels, &colors);
        }
        shape => {
            let n = shape.len().max(1) as f32;
            let radius = (area.width as f32 / (2.0 * n.sqrt())).clamp(2.0, 12.0);
            fill_points(&mut img, &area, &speed, &field.lats, &field.lons, radius, &levels, &colors);
        }
    }

    let lon_ticks = nice_ticks(area.lon_min, area.lon_max, 8);
    let lat_ticks = nice_ticks(area.lat_min, area.lat_max, 6);
    draw_grid_lines(&mut img, &area, &lon_ticks, &lat_ticks);

    let indices = subsample_indices(field.shape, config.quiver.stride);
    let arrows = build_arrows(&area, &field.u, &field.v, &field.lats, &field.lons, &indices, config.quiver.scale);
    let shaft_width = (config.quiver.width * area.width as f32).max(1.0);
    draw_arrows(&mut img, &arrows, &BLUES, shaft_width);
    debug!(arrows = arrows.len(), stride = config.quiver.stride, "Drew wind vectors");

    draw_hollow_rect_mut(
        &mut img,
        Rect::at(area.left as i32, area.top as i32).of_size(area.width, area.height),
        INK,
    );
    draw_axes(&mut img, &text, &area, &lon_ticks, &lat_ticks);

    text.draw_centered(&mut img, &plot_title(field), (area.left + area.width / 2) as i32, 20, TITLE_SIZE, INK);
    draw_colorbar(&mut img, &text, &area, &levels, &colors);

    Ok(img)
}

/// Render the figure and write it as PNG to `output`.
///
/// Prints the `✓ Plot saved:` progress line.
pub fn plot_wind_field(field: &WindField, output: &Path, config: &PlotConfig) -> RenderResult<()> {
    let start = Instant::now();
    let img = render_plot(field, config)?;
    write_png(&img, output)?;

    info!(
        path = %output.display(),
        width = config.width,
        height = config.height,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Wrote wind plot"
    );
    println!("✓ Plot saved: {}", output.display());
    Ok(())
}

fn finite_range(values: &[f32]) -> Option<(f32, f32)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Light lines at every tick, blended over what is already drawn.
fn draw_grid_lines(img: &mut RgbaImage, area: &PlotArea, lon_ticks: &[f32], lat_ticks: &[f32]) {
    for &lon in lon_ticks {
        let (x, _) = area.to_pixel(lon, area.lat_max);
        let x = x.round() as u32;
        if x < area.left || x > area.right() {
            continue;
        }
        for y in area.top..=area.bottom() {
            blend_pixel(img, x, y, GRID_COLOR, GRID_ALPHA);
        }
    }
    for &lat in lat_ticks {
        let (_, y) = area.to_pixel(area.lon_min, lat);
        let y = y.round() as u32;
        if y < area.top || y > area.bottom() {
            continue;
        }
        for x in area.left..=area.right() {
            blend_pixel(img, x, y, GRID_COLOR, GRID_ALPHA);
        }
    }
}

fn blend_pixel(img: &mut RgbaImage, x: u32, y: u32, color: Color, alpha: f32) {
    let below = Color::from(*img.get_pixel(x, y));
    img.put_pixel(x, y, color.over(below, alpha).to_rgba());
}

fn draw_axes(img: &mut RgbaImage, text: &TextRenderer, area: &PlotArea, lon_ticks: &[f32], lat_ticks: &[f32]) {
    let bottom = area.bottom() as i32;
    let left = area.left as i32;

    let lon_step = tick_step(lon_ticks);
    for &lon in lon_ticks {
        let (x, _) = area.to_pixel(lon, area.lat_min);
        draw_line_segment_mut(img, (x, bottom as f32), (x, (bottom + TICK_LENGTH) as f32), INK);
        text.draw_centered(img, &format_tick(lon, lon_step), x.round() as i32, bottom + TICK_LENGTH + 4, TICK_SIZE, INK);
    }

    let lat_step = tick_step(lat_ticks);
    for &lat in lat_ticks {
        let (_, y) = area.to_pixel(area.lon_min, lat);
        draw_line_segment_mut(img, ((left - TICK_LENGTH) as f32, y), (left as f32, y), INK);
        text.draw_right(img, &format_tick(lat, lat_step), left - TICK_LENGTH - 4, y.round() as i32, TICK_SIZE, INK);
    }

    let cx = (area.left + area.width / 2) as i32;
    text.draw_centered(img, "Longitude", cx, bottom + TICK_LENGTH + 36, LABEL_SIZE, INK);
    let cy = (area.top + area.height / 2) as i32;
    text.draw_vertical(img, "Latitude", left - 80, cy, LABEL_SIZE, INK);
}

fn tick_step(ticks: &[f32]) -> f32 {
    match ticks {
        [a, b, ..] => b - a,
        _ => 1.0,
    }
}

/// Vertical bar of the band colors, lowest band at the bottom, with tick
/// labels at the band boundaries chosen by `nice_ticks`.
fn draw_colorbar(img: &mut RgbaImage, text: &TextRenderer, area: &PlotArea, levels: &[f32], colors: &[Color]) {
    let (Some(&lo), Some(&hi)) = (levels.first(), levels.last()) else {
        return;
    };
    if colors.is_empty() || hi <= lo {
        return;
    }

    let x = (area.right() + COLORBAR_GAP) as i32;
    let top = area.top as i32;
    let height = area.height as f32;
    let band_height = height / colors.len() as f32;

    for (i, color) in colors.iter().enumerate() {
        let y1 = top as f32 + height - i as f32 * band_height;
        let y0 = y1 - band_height;
        let (y0, y1) = (y0.round() as i32, y1.round() as i32);
        if y1 > y0 {
            draw_filled_rect_mut(
                img,
                Rect::at(x, y0).of_size(COLORBAR_WIDTH, (y1 - y0) as u32),
                color.to_rgba(),
            );
        }
    }
    draw_hollow_rect_mut(img, Rect::at(x, top).of_size(COLORBAR_WIDTH, area.height), INK);

    let ticks = nice_ticks(lo, hi, 6);
    let step = tick_step(&ticks);
    let right = x + COLORBAR_WIDTH as i32;
    for &value in &ticks {
        let y = top as f32 + height * (hi - value) / (hi - lo);
        draw_line_segment_mut(img, (right as f32, y), ((right + 6) as f32, y), INK);
        text.draw(img, &format_tick(value, step), right + 10, y.round() as i32 - TICK_SIZE as i32 / 2, TICK_SIZE, INK);
    }

    text.draw_vertical(img, "Wind Speed (m/s)", right + 85, top + area.height as i32 / 2, LABEL_SIZE, INK);
}
