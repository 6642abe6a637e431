//! Generators for synthetic provider payloads.
//!
//! Payloads are built as `serde_json::Value` in the exact shape the provider
//! returns, so tests exercise the same parsing path as real data.

use modis_common::SubsetPayload;
use serde_json::{json, Value};

/// Provider-shaped JSON for one band.
///
/// `scale` is sent as a decimal string like the provider does.
pub fn band_payload_json(band: &str, scale: f64, rows: usize, cols: usize, data: &[i64]) -> Value {
    json!({
        "band": band,
        "scale": scale.to_string(),
        "nrows": rows,
        "ncols": cols,
        "units": "reflectance",
        "subset": [{
            "modis_date": "A2020001",
            "calendar_date": "2020-01-01",
            "band": band,
            "data": data,
        }],
    })
}

/// Provider-shaped JSON for the QC layer (non-numeric scale).
pub fn qc_payload_json(band: &str, rows: usize, cols: usize, bits: &[u32]) -> Value {
    json!({
        "band": band,
        "scale": "Not Available",
        "nrows": rows,
        "ncols": cols,
        "subset": [{
            "modis_date": "A2020001",
            "calendar_date": "2020-01-01",
            "band": band,
            "data": bits,
        }],
    })
}

/// Parse a JSON value into a payload.
pub fn to_payload(value: Value) -> SubsetPayload {
    serde_json::from_value(value).expect("generated payload must deserialize")
}

/// A band whose every sample equals `value`.
pub fn uniform_band(band: &str, scale: f64, rows: usize, cols: usize, value: i64) -> SubsetPayload {
    to_payload(band_payload_json(band, scale, rows, cols, &vec![value; rows * cols]))
}

/// A QC layer with no flags set.
pub fn clear_qc(band: &str, rows: usize, cols: usize) -> SubsetPayload {
    to_payload(qc_payload_json(band, rows, cols, &vec![0; rows * cols]))
}

/// A QC layer with `bits` set at the given `(row, col)` cells.
pub fn qc_with_flags(band: &str, rows: usize, cols: usize, flagged: &[(usize, usize)], bits: u32) -> SubsetPayload {
    let mut data = vec![0u32; rows * cols];
    for &(row, col) in flagged {
        data[row * cols + col] |= bits;
    }
    to_payload(qc_payload_json(band, rows, cols, &data))
}

/// A band ramping linearly from `min` (first sample) to `max` (last sample).
pub fn ramp_band(band: &str, scale: f64, rows: usize, cols: usize, min: i64, max: i64) -> SubsetPayload {
    let n = rows * cols;
    let data: Vec<i64> = (0..n)
        .map(|i| {
            if n <= 1 {
                min
            } else {
                min + (max - min) * i as i64 / (n as i64 - 1)
            }
        })
        .collect();
    to_payload(band_payload_json(band, scale, rows, cols, &data))
}
