//! Error types for subset payload handling.

use thiserror::Error;

/// Result type alias using SubsetError.
pub type SubsetResult<T> = Result<T, SubsetError>;

/// Errors raised while turning provider payloads into grids.
#[derive(Debug, Error)]
pub enum SubsetError {
    /// Declared grid dimensions disagree with the number of samples.
    #[error("{band}: declared {rows}x{cols} grid does not match {samples} samples")]
    ShapeMismatch {
        band: String,
        rows: usize,
        cols: usize,
        samples: usize,
    },

    /// The payload carried no subset entries at all.
    #[error("{0}: payload contains no subsets")]
    EmptySubset(String),

    #[error("{band}: invalid payload: {message}")]
    InvalidPayload { band: String, message: String },

    #[error("invalid date window: start {start} is after end {end}")]
    InvalidWindow { start: String, end: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SubsetError {
    /// Create an InvalidPayload error.
    pub fn invalid_payload(band: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            band: band.into(),
            message: message.into(),
        }
    }
}
