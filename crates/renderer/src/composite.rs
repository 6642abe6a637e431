//! RGBA compositing of three reconstructed bands.
//!
//! The alpha channel is the union of the per-band exclusion masks: a pixel
//! that any band distrusts becomes fully transparent instead of showing a
//! wrong colour.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use modis_common::{BandSubset, QualityMask, SubsetPayload};
use tracing::{error, info, warn};

use crate::config::{ColorBands, CompositeConfig};
use crate::error::{CompositeError, Result};
use crate::gamma::adjust_gamma;
use crate::png::write_png_atomic;
use crate::reconstruct::{reconstruct, ReconstructedChannel};
use crate::resample::resample;

const OPAQUE: u8 = 255;
const TRANSPARENT: u8 = 0;

/// Row-major RGBA grid, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeImage {
    pub rows: usize,
    pub cols: usize,
    pub pixels: Vec<u8>,
}

impl CompositeImage {
    /// Stack three channels and the derived alpha into one grid.
    pub fn from_channels(channels: &ColorBands<ReconstructedChannel>) -> Result<Self> {
        let (rows, cols) = (channels.red.rows, channels.red.cols);
        for (name, ch) in [("green", &channels.green), ("blue", &channels.blue)] {
            if (ch.rows, ch.cols) != (rows, cols) {
                return Err(CompositeError::DimensionMismatch {
                    band: name.to_string(),
                    expected: (rows, cols),
                    actual: (ch.rows, ch.cols),
                });
            }
        }

        let len = rows * cols;
        let mut pixels = Vec::with_capacity(len * 4);
        for i in 0..len {
            let masked = channels.iter().any(|ch| ch.invalid[i]);
            pixels.extend_from_slice(&[
                channels.red.intensity[i],
                channels.green.intensity[i],
                channels.blue.intensity[i],
                if masked { TRANSPARENT } else { OPAQUE },
            ]);
        }

        Ok(Self { rows, cols, pixels })
    }

    pub fn pixel(&self, row: usize, col: usize) -> [u8; 4] {
        let i = (row * self.cols + col) * 4;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }

    pub fn alpha(&self, row: usize, col: usize) -> u8 {
        self.pixel(row, col)[3]
    }

    pub fn transparent_count(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|p| p[3] == TRANSPARENT).count()
    }

    pub fn apply_gamma(&mut self, gamma: f64) {
        adjust_gamma(&mut self.pixels, gamma);
    }

    /// Convert into an image buffer (width = cols, height = rows).
    pub fn into_rgba_image(self) -> Result<RgbaImage> {
        let (rows, cols) = (self.rows, self.cols);
        if rows == 0 || cols == 0 {
            return Err(CompositeError::EmptyGrid { rows, cols });
        }
        RgbaImage::from_raw(cols as u32, rows as u32, self.pixels).ok_or_else(|| {
            CompositeError::Encode(format!("pixel buffer does not fit {}x{}", cols, rows))
        })
    }
}

/// The four payloads that make up one image.
#[derive(Debug, Clone)]
pub struct ImagePayloads {
    pub bands: ColorBands<SubsetPayload>,
    pub qc: SubsetPayload,
}

/// Result of one image attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    Written(PathBuf),
    Skipped { path: PathBuf, reason: String },
}

impl ImageOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Written(path) | Self::Skipped { path, .. } => path,
        }
    }
}

/// Builds false-colour images with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Compositor {
    config: CompositeConfig,
}

impl Compositor {
    pub fn new(config: CompositeConfig) -> Result<Self> {
        config.validate().map_err(CompositeError::InvalidConfig)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CompositeConfig {
        &self.config
    }

    /// Reconstruct each colour band against the shared QC mask.
    pub fn reconstruct_bands(
        &self,
        bands: &ColorBands<BandSubset>,
        qc: &QualityMask,
    ) -> Result<ColorBands<ReconstructedChannel>> {
        bands.try_map(|band| {
            let selector = self
                .config
                .selector(&band.band)
                .ok_or_else(|| CompositeError::MissingSelector(band.band.clone()))?;

            let channel = reconstruct(band, selector, qc, self.config.valid_range)?;
            if channel.is_all_invalid() {
                warn!(band = %band.band, "Every pixel is masked");
            }
            Ok(channel)
        })
    }

    /// Composite before gamma correction and resizing.
    pub fn compose(&self, bands: &ColorBands<BandSubset>, qc: &QualityMask) -> Result<CompositeImage> {
        let channels = self.reconstruct_bands(bands, qc)?;
        CompositeImage::from_channels(&channels)
    }

    /// Gamma-correct and resample a composite to the output size.
    pub fn finish(&self, mut image: CompositeImage) -> Result<RgbaImage> {
        image.apply_gamma(self.config.gamma);
        let rgba = image.into_rgba_image()?;
        Ok(resample(&rgba, self.config.output_size, self.config.filter))
    }

    /// Parse payloads and produce the final image in memory.
    pub fn build(&self, payloads: &ImagePayloads) -> Result<RgbaImage> {
        let names = &self.config.bands;
        let qc = QualityMask::from_payload(&names.qc, &payloads.qc)?;
        let bands = ColorBands {
            red: BandSubset::from_payload(&names.red, &payloads.bands.red)?,
            green: BandSubset::from_payload(&names.green, &payloads.bands.green)?,
            blue: BandSubset::from_payload(&names.blue, &payloads.bands.blue)?,
        };

        let composite = self.compose(&bands, &qc)?;
        self.finish(composite)
    }

    /// Run the whole pipeline and write the image to `path`.
    pub fn render(&self, payloads: &ImagePayloads, path: &Path) -> Result<PathBuf> {
        let image = self.build(payloads)?;
        write_png_atomic(path, &image)?;
        info!(path = %path.display(), size = self.config.output_size, "Image written");
        Ok(path.to_path_buf())
    }

    /// Like [`render`](Self::render), but a failure is logged and reported
    /// as [`ImageOutcome::Skipped`]; nothing is written in that case.
    pub fn render_or_skip(&self, payloads: &ImagePayloads, path: &Path) -> ImageOutcome {
        match self.render(payloads, path) {
            Ok(path) => ImageOutcome::Written(path),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Image not created");
                ImageOutcome::Skipped {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        }
    }
}
