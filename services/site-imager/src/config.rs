//! Imager configuration.
//!
//! Loaded from a YAML file when present, then overridden from environment
//! variables. Missing sections fall back to the MOD09A1/MYD09A1 defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use modis_common::Site;
use renderer::CompositeConfig;
use serde::{Deserialize, Serialize};

/// Top-level imager configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagerConfig {
    /// Root directory for output images (one subdirectory per site).
    pub img_dir: PathBuf,

    /// Root of the locally fetched subset payloads.
    pub data_dir: PathBuf,

    /// YAML site table.
    pub sites_file: PathBuf,

    /// Products to image, in order.
    pub products: Vec<String>,

    /// Render the dates of one site in parallel.
    pub parallel: bool,

    pub composite: CompositeConfig,
}

impl Default for ImagerConfig {
    fn default() -> Self {
        Self {
            img_dir: PathBuf::from("site-imgs"),
            data_dir: PathBuf::from("subsets"),
            sites_file: PathBuf::from("sites.yaml"),
            products: vec!["MYD09A1".to_string(), "MOD09A1".to_string()],
            parallel: true,
            composite: CompositeConfig::default(),
        }
    }
}

impl ImagerConfig {
    /// Load from a YAML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply overrides from environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("IMG_DIR") {
            self.img_dir = PathBuf::from(val);
        }

        if let Some(val) = lookup("SUBSET_DATA_DIR") {
            self.data_dir = PathBuf::from(val);
        }

        if let Some(val) = lookup("SITES_FILE") {
            self.sites_file = PathBuf::from(val);
        }

        if let Some(val) = lookup("MODIS_PRODUCTS") {
            let products: Vec<String> = val
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
            if !products.is_empty() {
                self.products = products;
            }
        }

        if let Some(val) = lookup("IMAGER_GAMMA") {
            if let Ok(gamma) = val.parse() {
                self.composite.gamma = gamma;
            }
        }

        if let Some(val) = lookup("IMAGER_OUTPUT_SIZE") {
            if let Ok(size) = val.parse() {
                self.composite.output_size = size;
            }
        }

        if let Some(val) = lookup("IMAGER_PARALLEL") {
            self.parallel = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.products.is_empty() {
            return Err("at least one product must be configured".to_string());
        }
        self.composite.validate()
    }
}

/// Load the site table (a YAML list of sites).
pub fn load_sites(path: &Path) -> Result<Vec<Site>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading site table {}", path.display()))?;
    let sites: Vec<Site> = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing site table {}", path.display()))?;
    Ok(sites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ImagerConfig::default();
        assert_eq!(config.img_dir, PathBuf::from("site-imgs"));
        assert_eq!(config.products, vec!["MYD09A1", "MOD09A1"]);
        assert!(config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = ImagerConfig::load(Path::new("/nonexistent/imager.yaml")).unwrap();
        assert_eq!(config, ImagerConfig::default());
    }

    #[test]
    fn test_yaml_partial_sections() {
        let yaml = r#"
img_dir: /tmp/out
products: [MOD09A1]
composite:
  gamma: 0.5
  output_size: 256
"#;
        let config = ImagerConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.img_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.products, vec!["MOD09A1"]);
        assert_eq!(config.composite.gamma, 0.5);
        assert_eq!(config.composite.output_size, 256);
        // Untouched composite fields keep their defaults.
        assert_eq!(config.composite.qc_selectors.len(), 3);
        assert_eq!(config.data_dir, PathBuf::from("subsets"));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("IMG_DIR", "/out"),
            ("MODIS_PRODUCTS", "MOD09A1, MYD09A1 ,"),
            ("IMAGER_GAMMA", "0.8"),
            ("IMAGER_OUTPUT_SIZE", "not-a-number"),
            ("IMAGER_PARALLEL", "0"),
        ]
        .into_iter()
        .collect();

        let mut config = ImagerConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.img_dir, PathBuf::from("/out"));
        assert_eq!(config.products, vec!["MOD09A1", "MYD09A1"]);
        assert_eq!(config.composite.gamma, 0.8);
        assert_eq!(config.composite.output_size, 224);
        assert!(!config.parallel);
    }

    #[test]
    fn test_validation() {
        let mut config = ImagerConfig::default();
        config.products.clear();
        assert!(config.validate().is_err());

        let mut config = ImagerConfig::default();
        config.composite.gamma = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_sites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sites.yaml");
        fs::write(&path, test_utils::SINGLE_SITE_YAML).unwrap();

        let sites = load_sites(&path).unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].site_tag, "harvard");
        assert_eq!(sites[0].km_left_right, 1);
    }

    #[test]
    fn test_shipped_config_files_load() {
        let config_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");

        let config = ImagerConfig::load(&config_dir.join("imager.yaml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.composite, CompositeConfig::default());

        let sites = load_sites(&config_dir.join("sites.yaml")).unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].site_tag, "harvard");
        assert_eq!((sites[0].km_above_below, sites[0].km_left_right), (1, 1));
        assert!(sites.iter().all(|s| s.start_date <= s.end_date));
    }
}
