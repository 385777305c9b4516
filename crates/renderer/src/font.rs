//! Figure title text drawn with an embedded TrueType font.

use corona_common::{CompositeError, CompositeResult};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};

/// Embedded font data - DejaVu Sans Mono
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Smallest title font size, in pixels.
pub const MIN_FONT_PX: f32 = 8.0;

/// Parse the embedded font.
pub fn load_font() -> CompositeResult<Font<'static>> {
    Font::try_from_bytes(FONT_DATA)
        .ok_or_else(|| CompositeError::RenderError("failed to load title font".to_string()))
}

/// Width and height in pixels of `text` set at `px`.
pub fn text_size(font: &Font, text: &str, px: f32) -> (u32, u32) {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let height = (v_metrics.ascent - v_metrics.descent).ceil().max(0.0) as u32;
    let width = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0);
    (width.ceil() as u32, height)
}

/// Largest size up to `max_px` at which `text` fits in `max_width` pixels,
/// never below `MIN_FONT_PX`.
pub fn fit_font_size(font: &Font, text: &str, max_px: f32, max_width: u32) -> f32 {
    let mut px = max_px.floor().max(MIN_FONT_PX);
    while px > MIN_FONT_PX && text_size(font, text, px).0 > max_width {
        px -= 1.0;
    }
    px
}

/// Draw `text` centred horizontally on the image and vertically in a band.
pub fn draw_text_centered(
    image: &mut RgbaImage,
    font: &Font,
    text: &str,
    band_top: u32,
    band_height: u32,
    px: f32,
    color: Rgba<u8>,
) {
    let (text_w, text_h) = text_size(font, text, px);
    let x = (image.width() as i32 - text_w as i32) / 2;
    let y = band_top as i32 + (band_height as i32 - text_h as i32) / 2;
    draw_text_mut(image, color, x, y, Scale::uniform(px), font, text);
}
