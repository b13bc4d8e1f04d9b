//! Core data models for the IPMA forecast scraper
//!
//! This module contains the query and record types that flow through the
//! acquisition pipeline, plus the static district allow-list.

pub mod district;

pub use district::{is_allowed_district, DISTRICTS};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of days the IPMA site renders in its weekly strip
pub const FORECAST_DAYS: u8 = 10;

/// A district/city pair as the IPMA site names them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// District label, matched exactly against the site's options (e.g. "Coimbra")
    pub district: String,
    /// City/locality label, matched case-insensitively (e.g. "Figueira da Foz")
    pub city: String,
}

impl Location {
    pub fn new(district: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            district: district.into(),
            city: city.into(),
        }
    }
}

/// Offset of the forecast day, 0 = today up to 9 = today + 9 days
///
/// Construction is the only place the range is checked, so every `DayIndex`
/// that reaches the scraper is already within the site's 10-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DayIndex(u8);

impl DayIndex {
    /// Returns `None` when `index` is outside `0..=9`
    pub fn new(index: u8) -> Option<Self> {
        (index < FORECAST_DAYS).then_some(Self(index))
    }

    pub fn today() -> Self {
        Self(0)
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the location is brought onto the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationStrategy {
    /// Navigate straight to `base#district&city` and let the site route it
    #[default]
    Fragment,
    /// Load the base page and drive the district and city dropdowns
    Selection,
}

impl LocationStrategy {
    pub fn from_flag(use_selection: bool) -> Self {
        if use_selection {
            LocationStrategy::Selection
        } else {
            LocationStrategy::Fragment
        }
    }
}

/// One validated forecast request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastQuery {
    pub location: Location,
    pub day_index: DayIndex,
    /// Read from the cache before scraping
    pub use_cache: bool,
    pub strategy: LocationStrategy,
}

/// A single day's forecast as displayed by the IPMA site
///
/// Every value is the page's display string, units included ("17°", "59%"),
/// so nothing here is parsed into numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// District the page reported as selected when the data was read
    #[serde(rename = "district")]
    pub district_selected: Option<String>,
    /// City the page reported as selected when the data was read
    pub city_selected: Option<String>,
    /// Day label, e.g. "Quinta, 19"
    pub date: String,
    pub temp_min: String,
    pub temp_max: String,
    /// Description taken from the weather icon's title
    #[serde(rename = "weather")]
    pub weather_description: String,
    #[serde(rename = "precipitation")]
    pub precipitation_probability: String,
    #[serde(rename = "wind_dir")]
    pub wind_direction: String,
    /// UV index label, e.g. "IUV: 7"; not every day shows one
    #[serde(rename = "iuv")]
    pub uv_index: Option<String>,
}

/// Envelope returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastResponse {
    pub forecast: Option<ForecastRecord>,
    /// Echo of the request's `use_cache` flag
    pub used_cache: bool,
}
