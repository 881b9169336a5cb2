//! Filled contour bands of a scalar field.
//!
//! The value range is split into equal-width bands. Grid fields are
//! rasterized one cell quad at a time with bilinear interpolation between
//! the four corner values; scattered (flat) fields are drawn as filled
//! square markers.

use image::RgbaImage;

use crate::gradient::{Color, Colormap};
use crate::layout::PlotArea;

/// Band boundaries: `bands + 1` evenly spaced values from `min` to `max`.
///
/// Returns an empty list when the range is not finite. A zero-width range
/// is widened by one unit on each side so a constant field still gets a
/// single visible band.
pub fn band_levels(min: f32, max: f32, bands: usize) -> Vec<f32> {
    if !min.is_finite() || !max.is_finite() || bands == 0 || max < min {
        return vec![];
    }
    let (lo, hi) = if max > min { (min, max) } else { (min - 1.0, max + 1.0) };
    let step = (hi - lo) / bands as f32;
    (0..=bands)
        .map(|i| if i == bands { hi } else { lo + step * i as f32 })
        .collect()
}

/// Index of the band containing `value`, or `None` outside the levels.
///
/// Bands are closed on the left; the last band also includes its upper
/// bound so the field maximum is always colored.
pub fn band_index(value: f32, levels: &[f32]) -> Option<usize> {
    let bands = levels.len().checked_sub(1)?;
    if bands == 0 || value.is_nan() || value < levels[0] || value > levels[bands] {
        return None;
    }
    let upper = levels.partition_point(|&level| level <= value);
    Some(upper.saturating_sub(1).min(bands - 1))
}

/// Colors of every band: each band takes the map's color at its midpoint,
/// composited over white at `alpha`.
pub fn band_colors(colormap: &Colormap, bands: usize, alpha: f32) -> Vec<Color> {
    (0..bands)
        .map(|i| {
            colormap
                .sample((i as f32 + 0.5) / bands as f32)
                .over(Color::WHITE, alpha)
        })
        .collect()
}

/// Fill the plot area with the banded field.
///
/// `values`, `lats` and `lons` are row-major with `rows * cols` entries.
pub fn fill_grid(
    img: &mut RgbaImage,
    area: &PlotArea,
    values: &[f32],
    lats: &[f32],
    lons: &[f32],
    rows: usize,
    cols: usize,
    levels: &[f32],
    colors: &[Color],
) {
    if rows < 2 || cols < 2 {
        return;
    }

    for r in 0..rows - 1 {
        for c in 0..cols - 1 {
            let corners = [
                r * cols + c,
                r * cols + c + 1,
                (r + 1) * cols + c,
                (r + 1) * cols + c + 1,
            ];
            let v = corners.map(|i| values[i]);
            if v.iter().all(|x| x.is_nan()) {
                continue;
            }
            let pts = corners.map(|i| area.to_pixel(lons[i], lats[i]));
            fill_quad(img, area, pts, v, levels, colors);
        }
    }
}

/// Rasterize one cell treated as axis-aligned in pixel space.
///
/// Corner order is top-left, top-right, bottom-left, bottom-right in grid
/// index terms; pixel orientation is taken from the projected corners.
fn fill_quad(
    img: &mut RgbaImage,
    area: &PlotArea,
    pts: [(f32, f32); 4],
    v: [f32; 4],
    levels: &[f32],
    colors: &[Color],
) {
    let (x0, x1) = (pts[0].0, pts[1].0);
    let (y0, y1) = (pts[0].1, pts[2].1);
    if x0 == x1 || y0 == y1 {
        return;
    }

    let (px_min, px_max) = area.clip_x(x0.min(x1), x0.max(x1));
    let (py_min, py_max) = area.clip_y(y0.min(y1), y0.max(y1));

    for py in py_min..=py_max {
        let ty = ((py as f32 + 0.5 - y0) / (y1 - y0)).clamp(0.0, 1.0);
        for px in px_min..=px_max {
            let tx = ((px as f32 + 0.5 - x0) / (x1 - x0)).clamp(0.0, 1.0);
            let value = bilinear(v, tx, ty);
            if let Some(band) = band_index(value, levels) {
                img.put_pixel(px, py, colors[band].to_rgba());
            }
        }
    }
}

/// Bilinear interpolation; NaN corners are ignored when possible.
fn bilinear(v: [f32; 4], tx: f32, ty: f32) -> f32 {
    let weights = [
        (1.0 - tx) * (1.0 - ty),
        tx * (1.0 - ty),
        (1.0 - tx) * ty,
        tx * ty,
    ];
    let mut sum = 0.0;
    let mut total = 0.0;
    for (value, weight) in v.iter().zip(weights) {
        if !value.is_nan() {
            sum += value * weight;
            total += weight;
        }
    }
    if total > 0.0 {
        sum / total
    } else {
        f32::NAN
    }
}

/// Draw scattered values as filled squares of half-width `radius` pixels.
pub fn fill_points(
    img: &mut RgbaImage,
    area: &PlotArea,
    values: &[f32],
    lats: &[f32],
    lons: &[f32],
    radius: f32,
    levels: &[f32],
    colors: &[Color],
) {
    for ((&value, &lat), &lon) in values.iter().zip(lats).zip(lons) {
        let Some(band) = band_index(value, levels) else {
            continue;
        };
        let (x, y) = area.to_pixel(lon, lat);
        let (px_min, px_max) = area.clip_x(x - radius, x + radius);
        let (py_min, py_max) = area.clip_y(y - radius, y + radius);
        for py in py_min..=py_max {
            for px in px_min..=px_max {
                img.put_pixel(px, py, colors[band].to_rgba());
            }
        }
    }
}
