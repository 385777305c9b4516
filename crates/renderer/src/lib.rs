//! Composite rendering for solar observation maps.
//!
//! - Colormaps (gray, red temperature, AIA channels, K-Cor NRGF table)
//! - Layered reprojection onto the bottom layer's frame
//! - Title text in an embedded TrueType font
//! - PNG encoding with text metadata

pub mod colormap;
pub mod composite;
pub mod config;
pub mod font;
pub mod png;

pub use colormap::{interpolate_color, Color, Colormap, KCOR_NRGF_TABLE};
pub use composite::{
    composite_title, default_filename, display_range, encode_composite, render_composite, save_composite,
    source_label, PlotArea,
};
pub use config::RenderConfig;
pub use png::{encode_png, PngError, TextChunk};
