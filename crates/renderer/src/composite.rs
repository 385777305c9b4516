//! Layered rendering of processed maps into a titled figure.
//!
//! Layers are given bottom first. The bottom layer's coordinate frame
//! defines the plot square; every other layer is sampled by converting the
//! plot pixel to helioprojective coordinates and back into that layer's
//! pixel grid (nearest neighbour). Masked, NaN and out-of-field samples are
//! transparent, so lower layers show through.

use std::path::Path;

use chrono::{DateTime, Utc};
use corona_common::time::{compact_timestamp, iso_timestamp};
use corona_common::{CompositeError, CompositeResult};
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use rayon::prelude::*;
use solar_map::{DisplayRange, ObservationMap, Stretch};
use tracing::{debug, info};

use crate::colormap::{Color, Colormap};
use crate::config::RenderConfig;
use crate::font;
use crate::png::{encode_png, TextChunk};

/// Software name written into the PNG metadata.
pub const SOFTWARE: &str = concat!("corona-composite ", env!("CARGO_PKG_VERSION"));

/// Source names of the layers, top layer first, hyphen-joined.
pub fn source_label(layers: &[ObservationMap]) -> String {
    layers
        .iter()
        .rev()
        .map(|m| m.instrument.display_name())
        .collect::<Vec<_>>()
        .join("-")
}

/// Figure title: source label and ISO-like timestamp.
pub fn composite_title(layers: &[ObservationMap], time: &DateTime<Utc>) -> String {
    format!("{} {}", source_label(layers), iso_timestamp(time))
}

/// Default output file name: `<YYYYMMDD.HHMMSS>.<sources>.png`.
pub fn default_filename(layers: &[ObservationMap], time: &DateTime<Utc>) -> String {
    let sources = layers
        .iter()
        .rev()
        .map(|m| m.instrument.file_tag())
        .collect::<Vec<_>>()
        .join("-");
    format!("{}.{}.png", compact_timestamp(time), sources)
}

/// Value range a layer is normalized over.
///
/// `Auto` takes the minimum and maximum of unmasked finite pixels. A layer
/// with no such pixels, or a single value, gets a unit-width range.
pub fn display_range(map: &ObservationMap) -> (f64, f64) {
    match map.plot.range {
        DisplayRange::Fixed { min, max } => (min, max),
        DisplayRange::Auto => {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for (i, v) in map.data.iter().enumerate() {
                if !v.is_finite() || map.is_masked(i) {
                    continue;
                }
                let v = *v as f64;
                min = min.min(v);
                max = max.max(v);
            }
            if !min.is_finite() {
                (0.0, 1.0)
            } else if max <= min {
                (min, min + 1.0)
            } else {
                (min, max)
            }
        }
    }
}

/// A layer with its lookup table and normalization resolved.
struct PreparedLayer<'a> {
    map: &'a ObservationMap,
    colormap: Colormap,
    stretch: Stretch,
    min: f64,
    span: f64,
}

impl<'a> PreparedLayer<'a> {
    fn new(map: &'a ObservationMap) -> Self {
        let (min, max) = display_range(map);
        debug!(
            instrument = %map.instrument,
            min = min,
            max = max,
            colormap = ?map.plot.colormap,
            "Prepared composite layer"
        );
        Self {
            map,
            colormap: Colormap::for_kind(map.plot.colormap),
            stretch: map.plot.stretch,
            min,
            span: max - min,
        }
    }

    /// Color of the nearest pixel to fractional pixel (x, y), if visible.
    #[inline]
    fn sample(&self, x: f64, y: f64) -> Option<Color> {
        let (px, py) = (x.round(), y.round());
        if !(px >= 0.0 && py >= 0.0 && px < self.map.width as f64 && py < self.map.height as f64) {
            return None;
        }
        let index = py as usize * self.map.width + px as usize;
        let value = self.map.data[index];
        if !value.is_finite() || self.map.is_masked(index) {
            return None;
        }

        let t = if self.span > 0.0 {
            (value as f64 - self.min) / self.span
        } else {
            0.0
        };
        Some(self.colormap.lookup(self.stretch.apply(t)))
    }
}

/// Placement of the plot square on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotArea {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl PlotArea {
    /// Largest square below the title band, inset by the margin.
    pub fn for_config(config: &RenderConfig) -> Self {
        let (width, height) = config.canvas_size();
        let title = config.title_height();
        let available = height.saturating_sub(title);
        let size = width.min(available).saturating_sub(2 * config.margin_px);
        Self {
            x: (width - size) / 2,
            y: title + (available - size) / 2,
            size,
        }
    }
}

/// Render `layers` (bottom first) under `title`.
pub fn render_composite(layers: &[ObservationMap], title: &str, config: &RenderConfig) -> CompositeResult<RgbaImage> {
    config.validate()?;
    let bottom = layers
        .first()
        .ok_or_else(|| CompositeError::RenderError("no layers to composite".to_string()))?;

    let (width, height) = config.canvas_size();
    let area = PlotArea::for_config(config);
    let prepared: Vec<PreparedLayer> = layers.iter().map(PreparedLayer::new).collect();

    // Plot pixel -> bottom-layer pixel, preserving the bottom layer's aspect
    let size = area.size as f64;
    let step = bottom.width.max(bottom.height) as f64 / size;
    let (center_x, center_y) = (bottom.width as f64 / 2.0, bottom.height as f64 / 2.0);
    let background = Color::new(
        config.plot_background[0],
        config.plot_background[1],
        config.plot_background[2],
        config.plot_background[3],
    );

    let mut plot = vec![0u8; area.size as usize * area.size as usize * 4];
    plot.par_chunks_mut(area.size as usize * 4)
        .enumerate()
        .for_each(|(row, out)| {
            // Row 0 of the figure is the top of the sky, the last FITS row
            let by = center_y - (row as f64 + 0.5 - size / 2.0) * step - 0.5;
            for (col, px) in out.chunks_exact_mut(4).enumerate() {
                let bx = center_x + (col as f64 + 0.5 - size / 2.0) * step - 0.5;
                let (tx, ty) = bottom.wcs.pixel_to_world(bx, by);

                let mut color = background;
                for (i, layer) in prepared.iter().enumerate() {
                    let (lx, ly) = if i == 0 {
                        (bx, by)
                    } else {
                        layer.map.wcs.world_to_pixel(tx, ty)
                    };
                    if let Some(c) = layer.sample(lx, ly) {
                        color = c.over(color);
                    }
                }
                px.copy_from_slice(&color.to_array());
            }
        });

    let plot = RgbaImage::from_raw(area.size, area.size, plot)
        .ok_or_else(|| CompositeError::RenderError("plot buffer size mismatch".to_string()))?;

    let mut canvas = RgbaImage::from_pixel(width, height, Rgba(config.background));
    imageops::replace(&mut canvas, &plot, area.x as i64, area.y as i64);
    draw_hollow_rect_mut(
        &mut canvas,
        Rect::at(area.x as i32 - 1, area.y as i32 - 1).of_size(area.size + 2, area.size + 2),
        Rgba(config.text_color),
    );
    draw_title(&mut canvas, title, config)?;

    debug!(width = width, height = height, layers = layers.len(), "Rendered composite");
    Ok(canvas)
}

fn draw_title(canvas: &mut RgbaImage, title: &str, config: &RenderConfig) -> CompositeResult<()> {
    let font = font::load_font()?;
    let band = config.title_height();
    let max_width = canvas.width().saturating_sub(2 * config.margin_px);
    let px = font::fit_font_size(&font, title, band as f32 * 0.6, max_width);
    font::draw_text_centered(canvas, &font, title, 0, band, px, Rgba(config.text_color));
    Ok(())
}

/// Encode a rendered figure as PNG with title and provenance metadata.
pub fn encode_composite(image: &RgbaImage, title: &str) -> CompositeResult<Vec<u8>> {
    let text = [
        TextChunk::new("Title", title),
        TextChunk::new("Software", SOFTWARE),
        TextChunk::new("Creation Time", Utc::now().to_rfc2822()),
    ];
    encode_png(image.as_raw(), image.width() as usize, image.height() as usize, &text)
        .map_err(|e| CompositeError::RenderError(e.to_string()))
}

/// Render, encode and write the composite to `path`.
///
/// Nothing is written unless rendering and encoding both succeed.
pub fn save_composite(
    layers: &[ObservationMap],
    title: &str,
    config: &RenderConfig,
    path: &Path,
) -> CompositeResult<()> {
    let image = render_composite(layers, title, config)?;
    let png = encode_composite(&image, title)?;
    std::fs::write(path, &png)?;
    info!(path = %path.display(), bytes = png.len(), "Wrote composite");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_area_default() {
        let area = PlotArea::for_config(&RenderConfig::default());
        // 800x800 canvas, 48 px title band, 8 px margins
        assert_eq!(area.size, 736);
        assert_eq!(area.x, 32);
        assert_eq!(area.y, 56);
    }

    #[test]
    fn test_plot_area_wide_canvas() {
        let area = PlotArea::for_config(&RenderConfig::with_size(12.0, 6.0));
        assert_eq!(area.size, 600 - 36 - 16);
        assert_eq!(area.x, (1200 - area.size) / 2);
    }
}
