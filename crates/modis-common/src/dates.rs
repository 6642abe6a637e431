//! Provider date tokens and date-window resolution.
//!
//! The provider publishes, per location, a listing that pairs each calendar
//! date with its own date token (`A2020001` style). Images are requested by
//! token; the token is otherwise opaque.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{SubsetError, SubsetResult};

/// Provider-native date token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateToken(String);

impl DateToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the provider `dates` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDate {
    pub calendar_date: NaiveDate,
    pub modis_date: DateToken,
}

/// The provider `dates` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateListing {
    pub dates: Vec<ProviderDate>,
}

impl DateListing {
    pub fn from_json(json: &str) -> SubsetResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Result of resolving a window against a listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedDates {
    /// Tokens inside the window, in listing order.
    pub tokens: Vec<DateToken>,
    /// Earliest token dated on or after the window start.
    pub first_on_or_after_start: Option<DateToken>,
    /// Latest token dated on or before the window end.
    pub last_on_or_before_end: Option<DateToken>,
}

/// Select the tokens a site needs for its requested window.
pub fn resolve(listing: &[ProviderDate], window: DateWindow) -> SubsetResult<ResolvedDates> {
    if window.start > window.end {
        return Err(SubsetError::InvalidWindow {
            start: window.start.to_string(),
            end: window.end.to_string(),
        });
    }

    let tokens = listing
        .iter()
        .filter(|d| window.contains(d.calendar_date))
        .map(|d| d.modis_date.clone())
        .collect();

    let first_on_or_after_start = listing
        .iter()
        .filter(|d| d.calendar_date >= window.start)
        .min_by_key(|d| d.calendar_date)
        .map(|d| d.modis_date.clone());

    let last_on_or_before_end = listing
        .iter()
        .filter(|d| d.calendar_date <= window.end)
        .max_by_key(|d| d.calendar_date)
        .map(|d| d.modis_date.clone());

    Ok(ResolvedDates {
        tokens,
        first_on_or_after_start,
        last_on_or_before_end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn listing() -> Vec<ProviderDate> {
        [
            (date(2020, 1, 1), "A2020001"),
            (date(2020, 1, 9), "A2020009"),
            (date(2020, 1, 17), "A2020017"),
            (date(2020, 1, 25), "A2020025"),
        ]
        .into_iter()
        .map(|(calendar_date, token)| ProviderDate {
            calendar_date,
            modis_date: DateToken::new(token),
        })
        .collect()
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let resolved = resolve(&listing(), DateWindow::new(date(2020, 1, 9), date(2020, 1, 17))).unwrap();
        let tokens: Vec<_> = resolved.tokens.iter().map(DateToken::as_str).collect();
        assert_eq!(tokens, vec!["A2020009", "A2020017"]);
        assert_eq!(resolved.first_on_or_after_start, Some(DateToken::new("A2020009")));
        assert_eq!(resolved.last_on_or_before_end, Some(DateToken::new("A2020017")));
    }

    #[test]
    fn test_nearest_tokens_between_listing_dates() {
        let resolved = resolve(&listing(), DateWindow::new(date(2020, 1, 5), date(2020, 1, 20))).unwrap();
        assert_eq!(resolved.tokens.len(), 2);
        assert_eq!(resolved.first_on_or_after_start, Some(DateToken::new("A2020009")));
        assert_eq!(resolved.last_on_or_before_end, Some(DateToken::new("A2020017")));
    }

    #[test]
    fn test_window_between_two_dates_is_empty() {
        let resolved = resolve(&listing(), DateWindow::new(date(2020, 1, 2), date(2020, 1, 8))).unwrap();
        assert!(resolved.tokens.is_empty());
        assert_eq!(resolved.first_on_or_after_start, Some(DateToken::new("A2020009")));
        assert_eq!(resolved.last_on_or_before_end, Some(DateToken::new("A2020001")));
    }

    #[test]
    fn test_window_outside_listing() {
        let resolved = resolve(&listing(), DateWindow::new(date(2021, 1, 1), date(2021, 2, 1))).unwrap();
        assert!(resolved.tokens.is_empty());
        assert_eq!(resolved.first_on_or_after_start, None);
        assert_eq!(resolved.last_on_or_before_end, Some(DateToken::new("A2020025")));
    }

    #[test]
    fn test_inverted_window() {
        let err = resolve(&listing(), DateWindow::new(date(2020, 2, 1), date(2020, 1, 1))).unwrap_err();
        assert!(matches!(err, SubsetError::InvalidWindow { .. }));
    }

    #[test]
    fn test_listing_from_provider_json() {
        let json = r#"{"dates": [
            {"modis_date": "A2000049", "calendar_date": "2000-02-18"},
            {"modis_date": "A2000057", "calendar_date": "2000-02-26"}
        ]}"#;
        let listing = DateListing::from_json(json).unwrap();
        assert_eq!(listing.dates.len(), 2);
        assert_eq!(listing.dates[1].modis_date.as_str(), "A2000057");
        assert_eq!(listing.dates[0].calendar_date, date(2000, 2, 18));
    }
}
