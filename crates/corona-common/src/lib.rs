//! Common types and utilities shared across the corona-composite crates.

pub mod error;
pub mod instrument;
pub mod logging;
pub mod time;

pub use error::{CompositeError, CompositeResult};
pub use instrument::Instrument;
pub use logging::LogConfig;
pub use time::{parse_time, TimeParseError, TimeWindow};
