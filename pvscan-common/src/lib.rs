//! # PVScan Common Library
//!
//! Shared code for the PrairieView metadata crates including:
//! - Common error and result types
//! - TOML configuration loading and resolution
//! - Logging initialisation
//! - PrairieView timestamp parsing

pub mod config;
pub mod error;
pub mod logging;
pub mod time;

pub use error::{Error, Result};
