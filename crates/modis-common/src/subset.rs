//! Provider subset payloads and the band / quality grids built from them.
//!
//! A subset payload is the JSON object the provider returns for one band at
//! one site and date:
//!
//! ```text
//! { "band": "sur_refl_b01", "scale": "0.0001", "nrows": 9, "ncols": 9,
//!   "subset": [ { "modis_date": "A2020001", "data": [ ... ] } ] }
//! ```
//!
//! Only the first entry of `subset` is ever used.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{SubsetError, SubsetResult};

/// Scale factor as sent by the provider.
///
/// Reflectance bands send a number or a decimal string; the QC layer may send
/// a non-numeric placeholder such as `"Not Available"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scale {
    Number(f64),
    Text(String),
}

impl Scale {
    /// Numeric value of the scale, if it has one.
    pub fn value(&self) -> Option<f64> {
        match self {
            Scale::Number(v) => Some(*v),
            Scale::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// One entry of the payload's `subset` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsetEntry {
    /// Flat row-major samples.
    pub data: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modis_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_date: Option<String>,
}

/// Raw provider response for a single band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsetPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    pub nrows: usize,
    pub ncols: usize,
    pub subset: Vec<SubsetEntry>,
}

impl SubsetPayload {
    /// Parse a payload from JSON text.
    pub fn from_json(json: &str) -> SubsetResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The entry that is actually used for this band.
    ///
    /// More than one entry is not an error; the extras are dropped with a warning.
    pub fn first_entry(&self, band: &str) -> SubsetResult<&SubsetEntry> {
        if self.subset.len() > 1 {
            warn!(
                band = %band,
                subsets = self.subset.len(),
                "Using the first subset only"
            );
        }
        self.subset
            .first()
            .ok_or_else(|| SubsetError::EmptySubset(band.to_string()))
    }
}

/// One spectral band at one site and date.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSubset {
    pub band: String,
    /// Multiplier from raw integer samples to reflectance.
    pub scale: f64,
    pub rows: usize,
    pub cols: usize,
    /// Row-major, expected length `rows * cols`.
    pub raw_samples: Vec<i32>,
}

impl BandSubset {
    pub fn new(band: impl Into<String>, scale: f64, rows: usize, cols: usize, raw_samples: Vec<i32>) -> Self {
        Self {
            band: band.into(),
            scale,
            rows,
            cols,
            raw_samples,
        }
    }

    /// Build a band subset from a provider payload.
    ///
    /// The sample count is not checked against the declared shape here; that
    /// happens during reconstruction so the failure carries the image context.
    pub fn from_payload(band: &str, payload: &SubsetPayload) -> SubsetResult<Self> {
        let scale = payload
            .scale
            .as_ref()
            .and_then(Scale::value)
            .ok_or_else(|| SubsetError::invalid_payload(band, "missing or non-numeric scale"))?;

        let entry = payload.first_entry(band)?;
        let raw_samples = entry
            .data
            .iter()
            .map(|&v| to_integer(band, v, i32::MIN as f64, i32::MAX as f64).map(|v| v as i32))
            .collect::<SubsetResult<Vec<_>>>()?;

        Ok(Self::new(band, scale, payload.nrows, payload.ncols, raw_samples))
    }

    /// Check that the declared dimensions match the sample count.
    pub fn check_shape(&self) -> SubsetResult<()> {
        check_shape(&self.band, self.rows, self.cols, self.raw_samples.len())
    }
}

/// Bit-packed per-pixel quality flags.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityMask {
    pub rows: usize,
    pub cols: usize,
    pub bits: Vec<u32>,
}

impl QualityMask {
    pub fn new(rows: usize, cols: usize, bits: Vec<u32>) -> Self {
        Self { rows, cols, bits }
    }

    /// Build the mask from the QC layer payload. The payload scale is ignored.
    pub fn from_payload(band: &str, payload: &SubsetPayload) -> SubsetResult<Self> {
        let entry = payload.first_entry(band)?;
        let bits = entry
            .data
            .iter()
            .map(|&v| to_integer(band, v, 0.0, u32::MAX as f64).map(|v| v as u32))
            .collect::<SubsetResult<Vec<_>>>()?;

        let mask = Self::new(payload.nrows, payload.ncols, bits);
        check_shape(band, mask.rows, mask.cols, mask.bits.len())?;
        Ok(mask)
    }

    pub fn check_shape(&self, band: &str) -> SubsetResult<()> {
        check_shape(band, self.rows, self.cols, self.bits.len())
    }
}

fn check_shape(band: &str, rows: usize, cols: usize, samples: usize) -> SubsetResult<()> {
    if rows.checked_mul(cols) != Some(samples) {
        return Err(SubsetError::ShapeMismatch {
            band: band.to_string(),
            rows,
            cols,
            samples,
        });
    }
    Ok(())
}

fn to_integer(band: &str, value: f64, min: f64, max: f64) -> SubsetResult<f64> {
    if !value.is_finite() || value.fract() != 0.0 || value < min || value > max {
        return Err(SubsetError::invalid_payload(
            band,
            format!("sample {} is not a valid integer", value),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(scale: &str, nrows: usize, ncols: usize, data: &str) -> String {
        format!(
            r#"{{"band": "sur_refl_b01", "scale": {}, "nrows": {}, "ncols": {},
                "subset": [{{"modis_date": "A2020001", "data": {}}}]}}"#,
            scale, nrows, ncols, data
        )
    }

    #[test]
    fn test_scale_number_and_string() {
        assert_eq!(Scale::Number(0.0001).value(), Some(0.0001));
        assert_eq!(Scale::Text("0.0001".to_string()).value(), Some(0.0001));
        assert_eq!(Scale::Text("Not Available".to_string()).value(), None);
    }

    #[test]
    fn test_band_from_payload_string_scale() {
        let json = payload(r#""0.0001""#, 2, 2, "[1, 2, 3, 4]");
        let p = SubsetPayload::from_json(&json).unwrap();
        let band = BandSubset::from_payload("sur_refl_b01", &p).unwrap();

        assert_eq!(band.scale, 0.0001);
        assert_eq!((band.rows, band.cols), (2, 2));
        assert_eq!(band.raw_samples, vec![1, 2, 3, 4]);
        assert!(band.check_shape().is_ok());
    }

    #[test]
    fn test_band_from_payload_requires_numeric_scale() {
        let json = payload(r#""Not Available""#, 1, 1, "[1]");
        let p = SubsetPayload::from_json(&json).unwrap();
        let err = BandSubset::from_payload("sur_refl_b01", &p).unwrap_err();
        assert!(matches!(err, SubsetError::InvalidPayload { .. }));
    }

    #[test]
    fn test_band_rejects_fractional_samples() {
        let json = payload("1.0", 1, 2, "[1, 2.5]");
        let p = SubsetPayload::from_json(&json).unwrap();
        assert!(BandSubset::from_payload("b", &p).is_err());
    }

    #[test]
    fn test_band_shape_mismatch() {
        let json = payload("1.0", 3, 3, "[1, 2, 3, 4]");
        let p = SubsetPayload::from_json(&json).unwrap();
        let band = BandSubset::from_payload("b", &p).unwrap();

        match band.check_shape() {
            Err(SubsetError::ShapeMismatch { rows, cols, samples, .. }) => {
                assert_eq!((rows, cols, samples), (3, 3, 4));
            }
            other => panic!("expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_first_entry_used_when_several() {
        let json = r#"{"scale": 1, "nrows": 1, "ncols": 2, "subset": [
            {"data": [10, 20]}, {"data": [30, 40]}
        ]}"#;
        let p = SubsetPayload::from_json(json).unwrap();
        let band = BandSubset::from_payload("b", &p).unwrap();
        assert_eq!(band.raw_samples, vec![10, 20]);
    }

    #[test]
    fn test_empty_subset_list() {
        let json = r#"{"scale": 1, "nrows": 1, "ncols": 1, "subset": []}"#;
        let p = SubsetPayload::from_json(json).unwrap();
        assert!(matches!(
            BandSubset::from_payload("b", &p),
            Err(SubsetError::EmptySubset(_))
        ));
    }

    #[test]
    fn test_quality_mask_ignores_scale() {
        let json = payload(r#""Not Available""#, 1, 3, "[0, 60, 245760]");
        let p = SubsetPayload::from_json(&json).unwrap();
        let qc = QualityMask::from_payload("sur_refl_qc_500m", &p).unwrap();
        assert_eq!(qc.bits, vec![0, 60, 245760]);
    }

    #[test]
    fn test_quality_mask_rejects_negative() {
        let json = payload("1", 1, 1, "[-1]");
        let p = SubsetPayload::from_json(&json).unwrap();
        assert!(QualityMask::from_payload("qc", &p).is_err());
    }

    #[test]
    fn test_quality_mask_shape_checked() {
        let json = payload("1", 2, 2, "[0, 0, 0]");
        let p = SubsetPayload::from_json(&json).unwrap();
        assert!(matches!(
            QualityMask::from_payload("qc", &p),
            Err(SubsetError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SubsetPayload::from_json("{\"nrows\": 1"),
            Err(SubsetError::Json(_))
        ));
    }
}
