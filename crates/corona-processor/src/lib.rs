//! Masking and intensity normalization for the composite layers.
//!
//! One stage per source:
//! - [`process_aia`]: hide faint EUV pixels off the limb
//! - [`process_kcor`]: display normalization by product type, then a radial mask
//! - [`process_lasco`]: pass-through

pub mod config;
pub mod mask;
pub mod normalize;
pub mod product;
pub mod stages;

pub use config::ProcessingConfig;
pub use mask::{euv_mask, radial_mask};
pub use normalize::{apply_gamma, clamp_negative, linear_rescale};
pub use product::CoronagraphProduct;
pub use stages::{process_aia, process_kcor, process_lasco};
