//! Site imager library.
//!
//! This module exposes the internal modules for testing purposes.

pub mod config;
pub mod pipeline;
pub mod sources;

pub use config::{load_sites, ImagerConfig};
pub use pipeline::{ImagingPipeline, RunSummary};
pub use sources::{LocalSubsetSource, SourceError, SubsetSource};
