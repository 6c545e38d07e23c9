//! Core infrastructure.
//!
//! - `config` - Configuration parsing and validation
//! - `time` - Deterministic time sources

pub mod config;
pub mod time;

pub use config::*;
pub use time::*;
