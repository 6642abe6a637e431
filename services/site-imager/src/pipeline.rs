//! Imaging pipeline: sites × products × dates to PNG files.
//!
//! Every image is attempted independently. A failure affects only that
//! image (or, for a missing date listing, that site), never the run.

use std::fs;

use anyhow::{Context, Result};
use modis_common::{resolve, Site, SiteRequest};
use rayon::prelude::*;
use renderer::{Compositor, ImageOutcome, ImagePayloads};
use tracing::{debug, error, info, instrument, warn};

use crate::config::ImagerConfig;
use crate::sources::{SourceError, SubsetSource};

/// Counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sites: usize,
    pub sites_skipped: usize,
    pub written: usize,
    pub skipped: usize,
}

impl RunSummary {
    fn record(&mut self, outcomes: &[ImageOutcome]) {
        let written = outcomes.iter().filter(|o| o.is_written()).count();
        self.written += written;
        self.skipped += outcomes.len() - written;
    }

    fn merge(&mut self, other: RunSummary) {
        self.sites += other.sites;
        self.sites_skipped += other.sites_skipped;
        self.written += other.written;
        self.skipped += other.skipped;
    }
}

/// Main imaging pipeline.
pub struct ImagingPipeline<S> {
    config: ImagerConfig,
    compositor: Compositor,
    source: S,
}

impl<S: SubsetSource> ImagingPipeline<S> {
    pub fn new(config: ImagerConfig, source: S) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;
        let compositor = Compositor::new(config.composite.clone())?;
        Ok(Self {
            config,
            compositor,
            source,
        })
    }

    pub fn config(&self) -> &ImagerConfig {
        &self.config
    }

    /// Image every site for every configured product.
    pub fn run(&self, sites: &[Site]) -> RunSummary {
        let mut summary = RunSummary::default();
        for product in &self.config.products {
            summary.merge(self.run_product(product, sites));
        }
        info!(
            written = summary.written,
            skipped = summary.skipped,
            sites_skipped = summary.sites_skipped,
            "Run complete"
        );
        summary
    }

    pub fn run_product(&self, product: &str, sites: &[Site]) -> RunSummary {
        let mut summary = RunSummary::default();
        for site in sites {
            summary.sites += 1;
            match self.image_site(product, site) {
                Ok(outcomes) => summary.record(&outcomes),
                Err(e) => {
                    summary.sites_skipped += 1;
                    error!(product = %product, site = %site.site_tag, error = %format!("{:#}", e), "Site skipped");
                }
            }
        }
        summary
    }

    /// Resolve dates for one site and attempt an image per date.
    #[instrument(skip(self, site), fields(site = %site.site_tag))]
    pub fn image_site(&self, product: &str, site: &Site) -> Result<Vec<ImageOutcome>> {
        let listing = self.source.dates(product, site)?;
        let resolved = resolve(&listing, site.window())?;
        debug!(
            first = ?resolved.first_on_or_after_start,
            last = ?resolved.last_on_or_before_end,
            dates = resolved.tokens.len(),
            "Resolved date window"
        );

        if resolved.tokens.is_empty() {
            warn!(start = %site.start_date, end = %site.end_date, "No provider dates inside window");
            return Ok(Vec::new());
        }

        let site_dir = site.image_dir(&self.config.img_dir);
        fs::create_dir_all(&site_dir)
            .with_context(|| format!("creating {}", site_dir.display()))?;

        let requests: Vec<SiteRequest> = resolved.tokens.into_iter().map(|t| site.request(t)).collect();
        let outcomes: Vec<ImageOutcome> = if self.config.parallel {
            requests.par_iter().map(|r| self.image_one(product, r)).collect()
        } else {
            requests.iter().map(|r| self.image_one(product, r)).collect()
        };
        Ok(outcomes)
    }

    /// Attempt a single image. Never fails; problems become `Skipped`.
    pub fn image_one(&self, product: &str, request: &SiteRequest) -> ImageOutcome {
        let path = request.output_path(&self.config.img_dir, product);
        debug!(
            product = %product,
            date = %request.date_token,
            path = %path.display(),
            "Building RGBA image"
        );

        match self.load_payloads(product, request) {
            Ok(payloads) => self.compositor.render_or_skip(&payloads, &path),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Subset unavailable, image not created");
                ImageOutcome::Skipped {
                    path,
                    reason: e.to_string(),
                }
            }
        }
    }

    fn load_payloads(&self, product: &str, request: &SiteRequest) -> Result<ImagePayloads, SourceError> {
        let names = &self.config.composite.bands;
        let bands = names
            .colors()
            .try_map(|band| self.source.subset(product, request, band))?;
        let qc = self.source.subset(product, request, &names.qc)?;
        Ok(ImagePayloads { bands, qc })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_record_and_merge() {
        let mut a = RunSummary::default();
        a.record(&[
            ImageOutcome::Written("a.png".into()),
            ImageOutcome::Skipped {
                path: "b.png".into(),
                reason: "x".to_string(),
            },
        ]);
        assert_eq!((a.written, a.skipped), (1, 1));

        let mut b = RunSummary {
            sites: 1,
            sites_skipped: 1,
            ..RunSummary::default()
        };
        b.merge(a);
        assert_eq!(
            b,
            RunSummary {
                sites: 1,
                sites_skipped: 1,
                written: 1,
                skipped: 1
            }
        );
    }
}
