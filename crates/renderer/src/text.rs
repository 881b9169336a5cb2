//! Text drawing with an embedded TrueType font.

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};

use crate::error::{RenderError, RenderResult};

/// Embedded font data - DejaVu Sans Mono
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Draws labels onto a figure.
pub struct TextRenderer {
    font: Font<'static>,
}

impl TextRenderer {
    pub fn new() -> RenderResult<Self> {
        Font::try_from_bytes(FONT_DATA)
            .map(|font| Self { font })
            .ok_or(RenderError::Font)
    }

    /// Width and height of `text` in pixels.
    pub fn measure(&self, text: &str, size: f32) -> (i32, i32) {
        text_size(Scale::uniform(size), &self.font, text)
    }

    /// Draw with the top-left corner at `(x, y)`.
    pub fn draw(&self, img: &mut RgbaImage, text: &str, x: i32, y: i32, size: f32, color: Rgba<u8>) {
        draw_text_mut(img, color, x, y, Scale::uniform(size), &self.font, text);
    }

    /// Draw horizontally centered on `cx`.
    pub fn draw_centered(&self, img: &mut RgbaImage, text: &str, cx: i32, y: i32, size: f32, color: Rgba<u8>) {
        let (w, _) = self.measure(text, size);
        self.draw(img, text, cx - w / 2, y, size, color);
    }

    /// Draw right-aligned so the text ends at `right`, vertically centered on `cy`.
    pub fn draw_right(&self, img: &mut RgbaImage, text: &str, right: i32, cy: i32, size: f32, color: Rgba<u8>) {
        let (w, h) = self.measure(text, size);
        self.draw(img, text, right - w, cy - h / 2, size, color);
    }

    /// Draw rotated a quarter turn counter-clockwise (reading bottom to top),
    /// centered on `(cx, cy)`.
    pub fn draw_vertical(&self, img: &mut RgbaImage, text: &str, cx: i32, cy: i32, size: f32, color: Rgba<u8>) {
        let (w, h) = self.measure(text, size);
        if w <= 0 || h <= 0 {
            return;
        }
        let pad = 2;
        let mut label = RgbaImage::from_pixel((w + 2 * pad) as u32, (h + 2 * pad) as u32, Rgba([0, 0, 0, 0]));
        self.draw(&mut label, text, pad, pad, size, color);

        let rotated = imageops::rotate270(&label);
        let x = cx - rotated.width() as i32 / 2;
        let y = cy - rotated.height() as i32 / 2;
        imageops::overlay(img, &rotated, x as i64, y as i64);
    }
}
