//! Common types shared by the MODIS site imager crates.
//!
//! - Provider subset payloads and their conversion into band / QC grids
//! - Site table rows and per-image site requests
//! - Provider date tokens and date-window resolution

pub mod dates;
pub mod error;
pub mod site;
pub mod subset;

pub use dates::{resolve, DateListing, DateToken, DateWindow, ProviderDate, ResolvedDates};
pub use error::{SubsetError, SubsetResult};
pub use site::{format_coordinate, Site, SiteRequest};
pub use subset::{BandSubset, QualityMask, Scale, SubsetEntry, SubsetPayload};
