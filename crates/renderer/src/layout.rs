//! Mapping between geographic coordinates and figure pixels.

/// The rectangle of the figure that holds data, and the lon/lat window it
/// shows. Longitude grows to the right, latitude grows upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    pub lon_min: f32,
    pub lon_max: f32,
    pub lat_min: f32,
    pub lat_max: f32,
}

impl PlotArea {
    /// Fit the data window to the finite coordinates in `lats` / `lons`.
    ///
    /// Returns `None` when no coordinate pair is finite. A window with zero
    /// extent along either axis is padded by one degree on each side.
    pub fn fit(left: u32, top: u32, width: u32, height: u32, lats: &[f32], lons: &[f32]) -> Option<Self> {
        let (lat_min, lat_max) = finite_bounds(lats)?;
        let (lon_min, lon_max) = finite_bounds(lons)?;
        let (lat_min, lat_max) = pad_degenerate(lat_min, lat_max);
        let (lon_min, lon_max) = pad_degenerate(lon_min, lon_max);

        Some(Self {
            left,
            top,
            width,
            height,
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        })
    }

    pub fn right(&self) -> u32 {
        self.left + self.width - 1
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.height - 1
    }

    /// Pixel position of a geographic point (may fall outside the area).
    pub fn to_pixel(&self, lon: f32, lat: f32) -> (f32, f32) {
        let x = self.left as f32 + (lon - self.lon_min) / (self.lon_max - self.lon_min) * self.width as f32;
        let y = self.top as f32 + (self.lat_max - lat) / (self.lat_max - self.lat_min) * self.height as f32;
        (x, y)
    }

    /// Pixel columns covering `[x0, x1]`, clipped to the area. Returns an
    /// empty inclusive range (`start > end`) when nothing is visible.
    pub fn clip_x(&self, x0: f32, x1: f32) -> (u32, u32) {
        clip(x0, x1, self.left, self.right())
    }

    /// Pixel rows covering `[y0, y1]`, clipped to the area.
    pub fn clip_y(&self, y0: f32, y1: f32) -> (u32, u32) {
        clip(y0, y1, self.top, self.bottom())
    }
}

fn clip(a: f32, b: f32, lo: u32, hi: u32) -> (u32, u32) {
    if !(a.is_finite() && b.is_finite()) || b < lo as f32 || a > hi as f32 + 1.0 {
        return (1, 0);
    }
    let start = a.floor().max(lo as f32) as u32;
    let end = (b.ceil() - 1.0).max(a.floor()).min(hi as f32) as u32;
    if end < start {
        (1, 0)
    } else {
        (start, end)
    }
}

fn finite_bounds(values: &[f32]) -> Option<(f32, f32)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn pad_degenerate(min: f32, max: f32) -> (f32, f32) {
    if max > min {
        (min, max)
    } else {
        (min - 1.0, max + 1.0)
    }
}

/// Round tick positions inside `[min, max]` with a 1/2/5 x 10^k step,
/// aiming for about `target` ticks.
pub fn nice_ticks(min: f32, max: f32, target: usize) -> Vec<f32> {
    if !(min.is_finite() && max.is_finite()) || max <= min || target == 0 {
        return vec![];
    }
    let raw = (max - min) / target as f32;
    let magnitude = 10f32.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|&s| s >= raw)
        .unwrap_or(10.0 * magnitude);

    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|k| k as f32 * step).collect()
}

/// Tick label text with just enough decimals for the step.
pub fn format_tick(value: f32, step: f32) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    let text = format!("{:.*}", decimals, value);
    // Avoid "-0"
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        text.trim_start_matches('-').to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> PlotArea {
        PlotArea::fit(100, 50, 200, 100, &[60.0, 50.0], &[0.0, 20.0]).unwrap()
    }

    #[test]
    fn test_to_pixel_corners() {
        let a = area();
        assert_eq!(a.to_pixel(0.0, 60.0), (100.0, 50.0));
        assert_eq!(a.to_pixel(20.0, 50.0), (300.0, 150.0));
        assert_eq!(a.to_pixel(10.0, 55.0), (200.0, 100.0));
    }

    #[test]
    fn test_fit_ignores_nan_and_pads() {
        let a = PlotArea::fit(0, 0, 10, 10, &[f32::NAN, 45.0], &[7.0, f32::NAN]).unwrap();
        assert_eq!((a.lat_min, a.lat_max), (44.0, 46.0));
        assert_eq!((a.lon_min, a.lon_max), (6.0, 8.0));

        assert!(PlotArea::fit(0, 0, 10, 10, &[], &[]).is_none());
    }

    #[test]
    fn test_clip() {
        let a = area();
        assert_eq!(a.clip_x(90.0, 110.0), (100, 109));
        assert_eq!(a.clip_x(250.0, 400.0), (250, 299));
        let (start, end) = a.clip_x(0.0, 50.0);
        assert!(start > end);
        let (start, end) = a.clip_y(f32::NAN, 60.0);
        assert!(start > end);
    }

    #[test]
    fn test_nice_ticks() {
        assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks(-12.0, 41.0, 6), vec![-10.0, 0.0, 10.0, 20.0, 30.0, 40.0]);
        assert!(nice_ticks(1.0, 1.0, 5).is_empty());
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(40.0, 10.0), "40");
        assert_eq!(format_tick(57.5, 0.5), "57.5");
        assert_eq!(format_tick(-0.0, 0.2), "0.0");
    }
}
