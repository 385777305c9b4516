//! Remote archive access for composite inputs.
//!
//! Provides the [`ArchiveClient`] trait, a JSOC implementation for SDO/AIA,
//! and nearest-in-time acquisition on top of any client.

pub mod acquire;
pub mod client;
pub mod config;
pub mod error;
pub mod jsoc;
pub mod query;

pub use acquire::{acquire_map, acquire_nearest};
pub use client::ArchiveClient;
pub use config::ArchiveConfig;
pub use error::{ArchiveError, ArchiveResult};
pub use jsoc::JsocArchive;
pub use query::{nearest_by_time, ArchiveQuery, Candidate};
