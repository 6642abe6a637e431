//! Power-law brightness correction for 8-bit pixels.

/// Build the 256-entry lookup table for `out = 255 * (in / 255) ^ gamma`.
///
/// Values are truncated; 0 and 255 are always fixed points.
pub fn gamma_lut(gamma: f64) -> [u8; 256] {
    let mut lut = [0u8; 256];
    if gamma == 1.0 {
        for (v, out) in lut.iter_mut().enumerate() {
            *out = v as u8;
        }
        return lut;
    }

    for (v, out) in lut.iter_mut().enumerate() {
        let normalized = v as f64 / 255.0;
        // Small bias keeps exact results from landing just below an integer.
        *out = (255.0 * normalized.powf(gamma) + 1e-9).clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Apply gamma correction in place to every byte (all channels, alpha included).
pub fn adjust_gamma(pixels: &mut [u8], gamma: f64) {
    if gamma == 1.0 {
        return;
    }
    let lut = gamma_lut(gamma);
    for p in pixels.iter_mut() {
        *p = lut[*p as usize];
    }
}
