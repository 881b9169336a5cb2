//! Color ramps for wind speed.
//!
//! Ramps are piecewise linear between evenly spaced stops, sampled with a
//! value normalized to `[0, 1]`.

use image::Rgba;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Composite this color with the given opacity over an opaque background.
    pub fn over(self, background: Color, alpha: f32) -> Color {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f32 * alpha + bg as f32 * (1.0 - alpha)).round() as u8;
        Color::rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

impl From<Rgba<u8>> for Color {
    fn from(p: Rgba<u8>) -> Self {
        Color::new(p[0], p[1], p[2], p[3])
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color::new(
        lerp(color1.r, color2.r),
        lerp(color1.g, color2.g),
        lerp(color1.b, color2.b),
        lerp(color1.a, color2.a),
    )
}

/// A sequential color map defined by evenly spaced stops.
#[derive(Debug, Clone, Copy)]
pub struct Colormap {
    pub name: &'static str,
    stops: &'static [Color],
}

/// Yellow-orange-red, light to dark (ColorBrewer 9-class YlOrRd).
pub const YL_OR_RD: Colormap = Colormap {
    name: "YlOrRd",
    stops: &[
        Color::rgb(0xff, 0xff, 0xcc),
        Color::rgb(0xff, 0xed, 0xa0),
        Color::rgb(0xfe, 0xd9, 0x76),
        Color::rgb(0xfe, 0xb2, 0x4c),
        Color::rgb(0xfd, 0x8d, 0x3c),
        Color::rgb(0xfc, 0x4e, 0x2a),
        Color::rgb(0xe3, 0x1a, 0x1c),
        Color::rgb(0xbd, 0x00, 0x26),
        Color::rgb(0x80, 0x00, 0x26),
    ],
};

/// White to dark blue (ColorBrewer 9-class Blues).
pub const BLUES: Colormap = Colormap {
    name: "Blues",
    stops: &[
        Color::rgb(0xf7, 0xfb, 0xff),
        Color::rgb(0xde, 0xeb, 0xf7),
        Color::rgb(0xc6, 0xdb, 0xef),
        Color::rgb(0x9e, 0xca, 0xe1),
        Color::rgb(0x6b, 0xae, 0xd6),
        Color::rgb(0x42, 0x92, 0xc6),
        Color::rgb(0x21, 0x71, 0xb5),
        Color::rgb(0x08, 0x51, 0x9c),
        Color::rgb(0x08, 0x30, 0x6b),
    ],
};

impl Colormap {
    /// Color at normalized position `t`; values outside `[0, 1]` clamp and
    /// NaN maps to the first stop.
    pub fn sample(&self, t: f32) -> Color {
        let last = self.stops.len() - 1;
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let position = t * last as f32;
        let lower = (position.floor() as usize).min(last);
        let upper = (lower + 1).min(last);
        interpolate_color(self.stops[lower], self.stops[upper], position - lower as f32)
    }

    /// Color of `value` normalized over `[min, max]`.
    ///
    /// A degenerate range maps everything to the middle of the ramp.
    pub fn map(&self, value: f32, min: f32, max: f32) -> Color {
        if max > min {
            self.sample((value - min) / (max - min))
        } else {
            self.sample(0.5)
        }
    }
}
