//! Shared test utilities for the modis-site-imager workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic band and QC payload generators
//! - Provider-shaped fixtures (date listings, site entries)
//! - Temp directories and the on-disk subset layout
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;
