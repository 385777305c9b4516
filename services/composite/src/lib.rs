//! The `kcor-composite` command: overlay SDO/AIA, MLSO K-Cor and SOHO/LASCO
//! C2 observations of one instant into a single titled PNG.

pub mod args;
pub mod pipeline;

pub use args::Args;
pub use pipeline::{CompositeRequest, Pipeline};
