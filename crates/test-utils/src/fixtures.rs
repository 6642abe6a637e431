//! Common fixtures for MOD09A1/MYD09A1 tests.

/// Provider band names.
pub mod bands {
    pub const RED: &str = "sur_refl_b01";
    pub const GREEN: &str = "sur_refl_b04";
    pub const BLUE: &str = "sur_refl_b03";
    pub const QC: &str = "sur_refl_qc_500m";

    /// Band quality bits of `sur_refl_qc_500m` for each colour band.
    pub const RED_SELECTOR: u32 = 60;
    pub const GREEN_SELECTOR: u32 = 245760;
    pub const BLUE_SELECTOR: u32 = 15360;

    /// Scale used by the surface reflectance bands.
    pub const REFLECTANCE_SCALE: f64 = 0.0001;
}

/// Raw sample values of interest.
pub mod samples {
    pub const SR_MIN: i64 = -100;
    pub const SR_MAX: i64 = 16000;
    pub const MID: i64 = 8000;
    /// Provider fill value.
    pub const FILL: i64 = -28672;
}

/// A provider `dates` listing covering January 2020.
pub fn january_2020_dates_json() -> serde_json::Value {
    serde_json::json!({
        "dates": [
            {"modis_date": "A2020001", "calendar_date": "2020-01-01"},
            {"modis_date": "A2020009", "calendar_date": "2020-01-09"},
            {"modis_date": "A2020017", "calendar_date": "2020-01-17"},
            {"modis_date": "A2020025", "calendar_date": "2020-01-25"},
        ]
    })
}

/// A one-site table in YAML.
pub const SINGLE_SITE_YAML: &str = r#"
- site_tag: harvard
  latitude: 42.5378
  longitude: -72.1715
  start_date: 2020-01-01
  end_date: 2020-01-10
  kmAboveBelow: 1
  kmLeftRight: 1
"#;
