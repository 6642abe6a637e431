//! False-color image rendering for MODIS surface reflectance subsets.
//!
//! Pipeline for one site/date:
//!
//! ```text
//! QC payload ──► QualityMask ─────────────┐
//!                                         ▼
//! red/green/blue payloads ──► reconstruct (range + QC masking, 0-255 rescale)
//!                                         │
//!                                         ▼
//!                          CompositeImage (RGB + alpha from mask union)
//!                                         │
//!                            gamma ──► resample ──► PNG (atomic write)
//! ```

pub mod composite;
pub mod config;
pub mod error;
pub mod gamma;
pub mod png;
pub mod reconstruct;
pub mod resample;

pub use composite::{CompositeImage, Compositor, ImageOutcome, ImagePayloads};
pub use config::{BandSet, ColorBands, CompositeConfig, ResampleFilter, ValidRange};
pub use error::{CompositeError, Result};
pub use reconstruct::{reconstruct, ReconstructedChannel};
