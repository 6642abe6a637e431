//! Site table rows and the per-image requests derived from them.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{DateToken, DateWindow};

/// One row of the site table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub site_tag: String,
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "kmAboveBelow", alias = "km_above_below")]
    pub km_above_below: u32,
    #[serde(rename = "kmLeftRight", alias = "km_left_right")]
    pub km_left_right: u32,
}

impl Site {
    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start_date, self.end_date)
    }

    /// Directory holding all images for this site.
    pub fn image_dir(&self, img_dir: &Path) -> PathBuf {
        img_dir.join(&self.site_tag)
    }

    /// Build the request for a single date token.
    pub fn request(&self, date_token: DateToken) -> SiteRequest {
        SiteRequest {
            site_tag: self.site_tag.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            date_token,
            km_above_below: self.km_above_below,
            km_left_right: self.km_left_right,
        }
    }
}

/// Everything needed to attempt one output image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRequest {
    pub site_tag: String,
    pub latitude: f64,
    pub longitude: f64,
    pub date_token: DateToken,
    pub km_above_below: u32,
    pub km_left_right: u32,
}

impl SiteRequest {
    /// `{product}_{lat}_{lon}_{token}_rgba.png`
    pub fn file_name(&self, product: &str) -> String {
        format!(
            "{}_{}_{}_{}_rgba.png",
            product,
            format_coordinate(self.latitude),
            format_coordinate(self.longitude),
            self.date_token
        )
    }

    /// `{img_dir}/{site_tag}/{file_name}`
    pub fn output_path(&self, img_dir: &Path, product: &str) -> PathBuf {
        img_dir.join(&self.site_tag).join(self.file_name(product))
    }
}

/// Render a coordinate for a file name.
///
/// Whole numbers keep one fractional digit (`35.0`) so names do not change
/// depending on how the site table spelled the value.
pub fn format_coordinate(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Site {
        Site {
            site_tag: "harvard".to_string(),
            latitude: 42.5378,
            longitude: -72.1715,
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
            km_above_below: 2,
            km_left_right: 2,
        }
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(35.0), "35.0");
        assert_eq!(format_coordinate(-72.1715), "-72.1715");
        assert_eq!(format_coordinate(0.5), "0.5");
    }

    #[test]
    fn test_output_path() {
        let request = site().request(DateToken::new("A2020001"));
        let path = request.output_path(Path::new("site-imgs"), "MOD09A1");
        assert_eq!(
            path,
            PathBuf::from("site-imgs/harvard/MOD09A1_42.5378_-72.1715_A2020001_rgba.png")
        );
    }

    #[test]
    fn test_site_yaml_accepts_provider_column_names() {
        let yaml = r#"
site_tag: bartlett
latitude: 44.0646
longitude: -71.2881
start_date: 2019-06-01
end_date: 2019-06-30
kmAboveBelow: 1
kmLeftRight: 1
"#;
        let site: Site = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(site.site_tag, "bartlett");
        assert_eq!(site.km_above_below, 1);
        assert_eq!(site.window().start, NaiveDate::from_ymd_opt(2019, 6, 1).unwrap());
    }
}
