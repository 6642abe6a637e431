//! Band reconstruction: raw samples to a masked 8-bit channel.

use modis_common::{BandSubset, QualityMask, SubsetError};

use crate::config::ValidRange;
use crate::error::{CompositeError, Result};

/// Rescaled intensities for one band with a parallel exclusion mask.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedChannel {
    pub rows: usize,
    pub cols: usize,
    /// Row-major 0-255 intensities. Out-of-range samples are stored as 0.
    pub intensity: Vec<u8>,
    /// `true` where the pixel must not be trusted.
    pub invalid: Vec<bool>,
}

impl ReconstructedChannel {
    pub fn is_invalid(&self, row: usize, col: usize) -> bool {
        self.invalid[row * self.cols + col]
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid.iter().filter(|&&m| m).count()
    }

    pub fn is_all_invalid(&self) -> bool {
        self.invalid.iter().all(|&m| m)
    }
}

/// Reconstruct one colour band.
///
/// Samples outside `range` are excluded, the rest are scaled to reflectance
/// and mapped linearly from `[range.min * scale, range.max * scale]` onto
/// `[0, 255]` (truncating). The mapping uses the theoretical bounds so
/// brightness is comparable across subsets. Pixels whose QC cell has any of
/// `selector` set are excluded as well.
pub fn reconstruct(
    band: &BandSubset,
    selector: u32,
    qc: &QualityMask,
    range: ValidRange,
) -> Result<ReconstructedChannel> {
    band.check_shape()?;
    qc.check_shape("quality mask")?;

    if (band.rows, band.cols) != (qc.rows, qc.cols) {
        return Err(CompositeError::DimensionMismatch {
            band: band.band.clone(),
            expected: (qc.rows, qc.cols),
            actual: (band.rows, band.cols),
        });
    }

    if !(band.scale.is_finite() && band.scale > 0.0) {
        return Err(SubsetError::invalid_payload(
            &band.band,
            format!("scale must be positive, got {}", band.scale),
        )
        .into());
    }

    let sr_min = range.min as f64 * band.scale;
    let sr_max = range.max as f64 * band.scale;
    let span = sr_max - sr_min;

    let len = band.raw_samples.len();
    let mut intensity = Vec::with_capacity(len);
    let mut invalid = Vec::with_capacity(len);

    for (&raw, &bits) in band.raw_samples.iter().zip(&qc.bits) {
        let in_range = range.contains(raw);
        let value = if in_range {
            let reflectance = raw as f64 * band.scale;
            ((reflectance - sr_min) / span * 255.0) as u8
        } else {
            0
        };

        intensity.push(value);
        invalid.push(!in_range || bits & selector != 0);
    }

    Ok(ReconstructedChannel {
        rows: band.rows,
        cols: band.cols,
        intensity,
        invalid,
    })
}
