//! Command-line interface parsing for the IPMA forecast CLI
//!
//! This module parses the request flags with clap and validates them into a
//! `ForecastQuery` before anything touches a browser. It also layers the
//! connection flags over the default `ScraperConfig`.

use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{ScraperConfig, DEFAULT_WEBDRIVER_URL, IPMA_FORECAST_URL};
use crate::data::{is_allowed_district, DayIndex, ForecastQuery, Location, LocationStrategy, DISTRICTS};

/// A single rejected request field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Error types for request validation
#[derive(Debug, Error)]
pub enum QueryError {
    /// One or more fields failed validation
    #[error("Invalid request: {}", summarize(.0))]
    Invalid(Vec<FieldError>),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// IPMA forecast CLI - scrape one day of the IPMA 10-day forecast
#[derive(Parser, Debug)]
#[command(name = "ipma-forecast")]
#[command(about = "Fetch one day of the IPMA 10-day forecast for a district and city")]
#[command(version)]
pub struct Cli {
    /// District name, exactly as IPMA spells it (e.g. "Coimbra", "São Jorge", "Setúbal")
    #[arg(long)]
    pub district: String,

    /// City/locality within the district (e.g. "Figueira da Foz"); matched case-insensitively
    #[arg(long)]
    pub city: String,

    /// Day to fetch: 0 = today, 1 = tomorrow, ..., 9 = today + 9 days
    #[arg(long = "index-day", value_name = "0-9")]
    pub index_day: u8,

    /// Return a cached result for the same query if one is still fresh
    #[arg(long)]
    pub use_cache: bool,

    /// Pick the location through the page's dropdowns instead of the URL fragment (slower)
    #[arg(long)]
    pub use_selenium_for_locations: bool,

    /// WebDriver server to open the browser on
    #[arg(long, env = "IPMA_WEBDRIVER_URL", default_value = DEFAULT_WEBDRIVER_URL)]
    pub webdriver_url: String,

    /// Forecast page to scrape
    #[arg(long, env = "IPMA_BASE_URL", default_value = IPMA_FORECAST_URL)]
    pub base_url: String,

    /// Run the browser without a display
    #[arg(long)]
    pub headless: bool,

    /// Directory for cached forecasts (defaults to the user cache directory)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,
}

impl Cli {
    /// Validates the request flags into a `ForecastQuery`
    ///
    /// Every invalid field is reported, not just the first one.
    pub fn query(&self) -> Result<ForecastQuery, QueryError> {
        let mut errors = Vec::new();

        if !is_allowed_district(&self.district) {
            errors.push(FieldError {
                field: "district",
                message: format!("District not OK. Use: {}", DISTRICTS.join(", ")),
            });
        }

        if self.city.trim().is_empty() {
            errors.push(FieldError {
                field: "city",
                message: "This field may not be blank.".to_string(),
            });
        }

        let day_index = DayIndex::new(self.index_day);
        if day_index.is_none() {
            errors.push(FieldError {
                field: "index_day",
                message: "Ensure this value is between 0 and 9.".to_string(),
            });
        }

        match day_index {
            Some(day_index) if errors.is_empty() => Ok(ForecastQuery {
                location: Location::new(self.district.clone(), self.city.clone()),
                day_index,
                use_cache: self.use_cache,
                strategy: LocationStrategy::from_flag(self.use_selenium_for_locations),
            }),
            _ => Err(QueryError::Invalid(errors)),
        }
    }

    /// Scraper settings with the connection flags applied
    pub fn scraper_config(&self) -> ScraperConfig {
        ScraperConfig {
            base_url: self.base_url.clone(),
            webdriver_url: self.webdriver_url.clone(),
            headless: self.headless,
            cache_dir: self.cache_dir.clone(),
            ..ScraperConfig::default()
        }
    }
}
