//! Protocol constants for compositing.
//!
//! Defaults follow the MOD09A1/MYD09A1 8-day 500 m surface reflectance
//! product: valid range from the MOD09 user guide and the 4-bit band quality
//! fields of `sur_refl_qc_500m`.

use std::collections::BTreeMap;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Inclusive range of raw samples that carry real reflectance.
///
/// Fill and error sentinels lie outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidRange {
    pub min: i32,
    pub max: i32,
}

impl ValidRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, raw: i32) -> bool {
        raw >= self.min && raw <= self.max
    }
}

impl Default for ValidRange {
    fn default() -> Self {
        Self::new(-100, 16000)
    }
}

/// One value per colour channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBands<T> {
    pub red: T,
    pub green: T,
    pub blue: T,
}

impl<T> ColorBands<T> {
    pub fn new(red: T, green: T, blue: T) -> Self {
        Self { red, green, blue }
    }

    /// Channels in red, green, blue order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        [&self.red, &self.green, &self.blue].into_iter()
    }

    pub fn try_map<U, E>(&self, mut f: impl FnMut(&T) -> Result<U, E>) -> Result<ColorBands<U>, E> {
        Ok(ColorBands {
            red: f(&self.red)?,
            green: f(&self.green)?,
            blue: f(&self.blue)?,
        })
    }
}

/// Provider band names used for each channel plus the QC layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSet {
    pub red: String,
    pub green: String,
    pub blue: String,
    pub qc: String,
}

impl BandSet {
    pub fn colors(&self) -> ColorBands<&str> {
        ColorBands::new(&self.red, &self.green, &self.blue)
    }
}

impl Default for BandSet {
    fn default() -> Self {
        Self {
            red: "sur_refl_b01".to_string(),
            green: "sur_refl_b04".to_string(),
            blue: "sur_refl_b03".to_string(),
            qc: "sur_refl_qc_500m".to_string(),
        }
    }
}

/// Resampling filter for the final resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    /// Bicubic.
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl Default for ResampleFilter {
    fn default() -> Self {
        Self::CatmullRom
    }
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Fixed settings for every image in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    pub valid_range: ValidRange,

    /// QC bits that invalidate a pixel for each band, keyed by band name.
    pub qc_selectors: BTreeMap<String, u32>,

    pub bands: BandSet,

    /// Power-law exponent applied to the composited image.
    pub gamma: f64,

    /// Side length of the square output image.
    pub output_size: u32,

    pub filter: ResampleFilter,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        let qc_selectors = BTreeMap::from([
            ("sur_refl_b01".to_string(), 0b11_1100),            // bits 2-5
            ("sur_refl_b04".to_string(), 0b11_1100_0000_0000_0000), // bits 14-17
            ("sur_refl_b03".to_string(), 0b11_1100_0000_0000),     // bits 10-13
        ]);

        Self {
            valid_range: ValidRange::default(),
            qc_selectors,
            bands: BandSet::default(),
            gamma: 0.4,
            output_size: 224,
            filter: ResampleFilter::default(),
        }
    }
}

impl CompositeConfig {
    /// Selector bits for a colour band.
    pub fn selector(&self, band: &str) -> Option<u32> {
        self.qc_selectors.get(band).copied()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.valid_range.min >= self.valid_range.max {
            return Err(format!(
                "valid_range min ({}) must be below max ({})",
                self.valid_range.min, self.valid_range.max
            ));
        }

        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err("gamma must be a positive number".to_string());
        }

        if self.output_size == 0 {
            return Err("output_size must be > 0".to_string());
        }

        for band in self.bands.colors().iter() {
            if !self.qc_selectors.contains_key(*band) {
                return Err(format!("no qc selector for band {}", band));
            }
        }

        Ok(())
    }
}
