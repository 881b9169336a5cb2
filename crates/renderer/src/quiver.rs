//! Wind vectors drawn as arrows.
//!
//! Arrows point the way the air moves (`u` east, `v` north). Length is
//! proportional to speed: an arrow of speed `scale` spans the full plot
//! width. Color comes from a sequential map normalized over the speeds of
//! the sampled cells.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use wind_common::FieldShape;

use crate::gradient::Colormap;
use crate::layout::PlotArea;

/// Sample every 20th row and column.
pub const DEFAULT_QUIVER_STRIDE: usize = 20;

/// Speed (m/s) that maps to an arrow as long as the plot is wide.
pub const DEFAULT_QUIVER_SCALE: f32 = 500.0;

/// Configuration for arrow rendering
#[derive(Debug, Clone)]
pub struct QuiverConfig {
    pub stride: usize,
    pub scale: f32,
    /// Shaft width as a fraction of the plot width
    pub width: f32,
}

impl Default for QuiverConfig {
    fn default() -> Self {
        Self {
            stride: DEFAULT_QUIVER_STRIDE,
            scale: DEFAULT_QUIVER_SCALE,
            width: 0.002,
        }
    }
}

/// Row-major indices of the cells that get an arrow.
///
/// Grids keep rows and columns `0, stride, 2*stride, ...`; flat fields keep
/// every `stride`-th cell. A stride of zero is treated as one.
pub fn subsample_indices(shape: FieldShape, stride: usize) -> Vec<usize> {
    let stride = stride.max(1);
    match shape {
        FieldShape::Grid { rows, cols } => (0..rows)
            .step_by(stride)
            .flat_map(|r| (0..cols).step_by(stride).map(move |c| r * cols + c))
            .collect(),
        FieldShape::Flat(n) => (0..n).step_by(stride).collect(),
    }
}

/// One arrow ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub x: f32,
    pub y: f32,
    /// Pixel offset of the tip from the tail
    pub dx: f32,
    pub dy: f32,
    pub speed: f32,
}

impl Arrow {
    pub fn length(&self) -> f32 {
        self.dx.hypot(self.dy)
    }
}

/// Build arrows for the sampled cells, skipping cells with missing data.
pub fn build_arrows(
    area: &PlotArea,
    u: &[f32],
    v: &[f32],
    lats: &[f32],
    lons: &[f32],
    indices: &[usize],
    scale: f32,
) -> Vec<Arrow> {
    let px_per_ms = area.width as f32 / scale;
    indices
        .iter()
        .filter_map(|&i| {
            let (u, v, lat, lon) = (*u.get(i)?, *v.get(i)?, *lats.get(i)?, *lons.get(i)?);
            if [u, v, lat, lon].iter().any(|x| !x.is_finite()) {
                return None;
            }
            let (x, y) = area.to_pixel(lon, lat);
            Some(Arrow {
                x,
                y,
                dx: u * px_per_ms,
                dy: -v * px_per_ms,
                speed: u.hypot(v),
            })
        })
        .collect()
}

/// Speed range of a set of arrows, `None` if empty.
pub fn speed_range(arrows: &[Arrow]) -> Option<(f32, f32)> {
    arrows.iter().fold(None, |acc, a| match acc {
        None => Some((a.speed, a.speed)),
        Some((lo, hi)) => Some((lo.min(a.speed), hi.max(a.speed))),
    })
}

/// Draw arrows colored by speed.
pub fn draw_arrows(img: &mut RgbaImage, arrows: &[Arrow], colormap: &Colormap, shaft_width: f32) {
    let Some((min, max)) = speed_range(arrows) else {
        return;
    };
    for arrow in arrows {
        let color = colormap.map(arrow.speed, min, max).to_rgba();
        draw_arrow(img, arrow, shaft_width, color);
    }
}

/// Shaft plus a triangular head. The head is 3 shaft widths wide and 5
/// long, shrunk proportionally for arrows shorter than the head.
fn draw_arrow(img: &mut RgbaImage, arrow: &Arrow, shaft_width: f32, color: Rgba<u8>) {
    let length = arrow.length();
    if length < 0.5 {
        return;
    }
    let (ux, uy) = (arrow.dx / length, arrow.dy / length);
    let (nx, ny) = (-uy, ux);

    let head_length = (5.0 * shaft_width).min(length);
    let head_half = 1.5 * shaft_width * head_length / (5.0 * shaft_width);

    let tip = (arrow.x + arrow.dx, arrow.y + arrow.dy);
    let base = (tip.0 - ux * head_length, tip.1 - uy * head_length);

    let half = shaft_width / 2.0;
    if half > 0.75 {
        let shaft = [
            point(arrow.x + nx * half, arrow.y + ny * half),
            point(base.0 + nx * half, base.1 + ny * half),
            point(base.0 - nx * half, base.1 - ny * half),
            point(arrow.x - nx * half, arrow.y - ny * half),
        ];
        fill_polygon(img, &shaft, color);
    } else {
        draw_line_segment_mut(img, (arrow.x, arrow.y), base, color);
    }

    let head = [
        point(tip.0, tip.1),
        point(base.0 + nx * head_half, base.1 + ny * head_half),
        point(base.0 - nx * head_half, base.1 - ny * head_half),
    ];
    fill_polygon(img, &head, color);
}

fn point(x: f32, y: f32) -> Point<i32> {
    Point::new(x.round() as i32, y.round() as i32)
}

/// Fill a polygon, degrading to an outline when rounding collapses it.
fn fill_polygon(img: &mut RgbaImage, poly: &[Point<i32>], color: Rgba<u8>) {
    let mut unique: Vec<Point<i32>> = Vec::with_capacity(poly.len());
    for p in poly {
        if unique.last() != Some(p) {
            unique.push(*p);
        }
    }
    while unique.len() > 1 && unique.first() == unique.last() {
        unique.pop();
    }

    if unique.len() >= 3 {
        draw_polygon_mut(img, &unique, color);
    } else if let [a, b] = unique[..] {
        draw_line_segment_mut(img, (a.x as f32, a.y as f32), (b.x as f32, b.y as f32), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::BLUES;

    fn area() -> PlotArea {
        PlotArea::fit(0, 0, 500, 500, &[0.0, 10.0], &[0.0, 10.0]).unwrap()
    }

    #[test]
    fn test_subsample_grid() {
        let idx = subsample_indices(FieldShape::Grid { rows: 41, cols: 45 }, 20);
        // Rows 0, 20, 40 and columns 0, 20, 40
        assert_eq!(idx.len(), 9);
        assert_eq!(&idx[..3], &[0, 20, 40]);
        assert_eq!(idx[3], 20 * 45);
        assert_eq!(idx[8], 40 * 45 + 40);
    }

    #[test]
    fn test_subsample_small_grid_keeps_origin() {
        assert_eq!(subsample_indices(FieldShape::Grid { rows: 3, cols: 3 }, 20), vec![0]);
        assert_eq!(subsample_indices(FieldShape::Grid { rows: 2, cols: 2 }, 0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_subsample_flat() {
        assert_eq!(subsample_indices(FieldShape::Flat(45), 20), vec![0, 20, 40]);
        assert!(subsample_indices(FieldShape::Flat(0), 20).is_empty());
    }

    #[test]
    fn test_arrow_geometry() {
        let a = area();
        let arrows = build_arrows(&a, &[10.0], &[-5.0], &[5.0], &[5.0], &[0], 500.0);

        assert_eq!(arrows.len(), 1);
        let arrow = arrows[0];
        assert_eq!((arrow.x, arrow.y), (250.0, 250.0));
        // 500 px wide plot, scale 500: one pixel per m/s, y axis flipped
        assert_eq!((arrow.dx, arrow.dy), (10.0, 5.0));
        assert!((arrow.speed - 125f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_missing_cells_skipped() {
        let a = area();
        let arrows = build_arrows(&a, &[1.0, f32::NAN], &[1.0, 1.0], &[1.0, 2.0], &[1.0, 2.0], &[0, 1, 7], 500.0);
        assert_eq!(arrows.len(), 1);
    }

    #[test]
    fn test_draw_arrows_paints_pixels() {
        let a = area();
        let mut img = RgbaImage::from_pixel(500, 500, Rgba([255, 255, 255, 255]));
        let arrows = build_arrows(&a, &[50.0, 100.0], &[0.0, 0.0], &[5.0, 2.0], &[1.0, 1.0], &[0, 1], 500.0);
        draw_arrows(&mut img, &arrows, &BLUES, 3.0);

        // The faster arrow is drawn in the darkest blue
        let darkest = BLUES.sample(1.0).to_rgba();
        assert!(img.pixels().any(|p| *p == darkest));
        // The calm canvas corner stays white
        assert_eq!(*img.get_pixel(499, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_speed_range() {
        assert_eq!(speed_range(&[]), None);
        let arrows = [
            Arrow { x: 0.0, y: 0.0, dx: 0.0, dy: 0.0, speed: 3.0 },
            Arrow { x: 0.0, y: 0.0, dx: 0.0, dy: 0.0, speed: 1.0 },
        ];
        assert_eq!(speed_range(&arrows), Some((1.0, 3.0)));
    }
}
