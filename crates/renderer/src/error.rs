//! Error types for compositing.

use std::path::PathBuf;

use modis_common::SubsetError;
use thiserror::Error;

/// Errors that fail a single image.
#[derive(Error, Debug)]
pub enum CompositeError {
    /// Payload parsing or shape validation failed.
    #[error(transparent)]
    Subset(#[from] SubsetError),

    /// Two grids that must line up have different dimensions.
    #[error("{band}: grid (rows, cols) is {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        band: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// No quality selector bits are configured for a colour band.
    #[error("no quality selector configured for band {0}")]
    MissingSelector(String),

    /// The composite has no pixels to resample.
    #[error("grid has no pixels ({rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("invalid composite configuration: {0}")]
    InvalidConfig(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// The finished image could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompositeError {
    pub fn persist(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persist {
            path: path.into(),
            source,
        }
    }

    /// True for the shape errors that come from inconsistent inputs.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::Subset(SubsetError::ShapeMismatch { .. }) | Self::DimensionMismatch { .. }
        )
    }
}

/// Result type for compositing operations.
pub type Result<T> = std::result::Result<T, CompositeError>;
