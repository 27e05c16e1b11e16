//! # Bunny Common Library
//!
//! Shared code for the bunny-score workspace:
//! - Error and result types
//! - TOML configuration model and loading
//! - Logging initialization

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
