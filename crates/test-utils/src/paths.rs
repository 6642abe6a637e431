//! Path utilities for tests: temp directories and the local subset layout.

use std::path::{Path, PathBuf};

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// `{root}/{product}/{site}/dates.json`
pub fn dates_listing_path(root: &Path, product: &str, site: &str) -> PathBuf {
    root.join(product).join(site).join("dates.json")
}

/// `{root}/{product}/{site}/{token}/{band}.json`
pub fn subset_payload_path(root: &Path, product: &str, site: &str, token: &str, band: &str) -> PathBuf {
    root.join(product)
        .join(site)
        .join(token)
        .join(format!("{}.json", band))
}

/// Write a JSON value, creating parent directories.
pub fn write_json(path: &Path, value: &serde_json::Value) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    let text = serde_json::to_string_pretty(value).expect("Failed to serialize fixture");
    std::fs::write(path, text).expect("Failed to write fixture");
}
