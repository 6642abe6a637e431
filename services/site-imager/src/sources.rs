//! Sources of provider subset payloads.
//!
//! Fetching from the provider happens elsewhere; the imager only reads
//! payloads that are already complete.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use modis_common::{DateListing, ProviderDate, Site, SiteRequest, SubsetError, SubsetPayload};
use thiserror::Error;
use tracing::debug;

/// Errors from a subset source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: SubsetError,
    },
}

/// Supplies date listings and band payloads for sites.
pub trait SubsetSource: Send + Sync {
    /// Provider date listing for a site.
    fn dates(&self, product: &str, site: &Site) -> Result<Vec<ProviderDate>, SourceError>;

    /// Payload for one band of one image.
    fn subset(&self, product: &str, request: &SiteRequest, band: &str) -> Result<SubsetPayload, SourceError>;
}

/// Reads payloads from a directory tree:
///
/// ```text
/// {root}/{product}/{site_tag}/dates.json
/// {root}/{product}/{site_tag}/{token}/{band}.json
/// ```
#[derive(Debug, Clone)]
pub struct LocalSubsetSource {
    root: PathBuf,
}

impl LocalSubsetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn dates_path(&self, product: &str, site_tag: &str) -> PathBuf {
        self.root.join(product).join(site_tag).join("dates.json")
    }

    pub fn subset_path(&self, product: &str, request: &SiteRequest, band: &str) -> PathBuf {
        self.root
            .join(product)
            .join(&request.site_tag)
            .join(request.date_token.as_str())
            .join(format!("{}.json", band))
    }

    fn read(path: &Path) -> Result<String, SourceError> {
        fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
            _ => SourceError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })
    }
}

impl SubsetSource for LocalSubsetSource {
    fn dates(&self, product: &str, site: &Site) -> Result<Vec<ProviderDate>, SourceError> {
        let path = self.dates_path(product, &site.site_tag);
        let text = Self::read(&path)?;
        let listing = DateListing::from_json(&text).map_err(|source| SourceError::Parse {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), dates = listing.dates.len(), "Loaded date listing");
        Ok(listing.dates)
    }

    fn subset(&self, product: &str, request: &SiteRequest, band: &str) -> Result<SubsetPayload, SourceError> {
        let path = self.subset_path(product, request, band);
        let text = Self::read(&path)?;
        SubsetPayload::from_json(&text).map_err(|source| SourceError::Parse { path, source })
    }
}
